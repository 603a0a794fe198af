use crate::api::{ComparisonResult, ModelCatalog, SampleText, Side};
use crate::session::ratings::RatingState;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Checking,
    Connected,
    Error,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConnectionStatus::Checking => "checking",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Error => "error",
        })
    }
}

/// Session state read by the presentation layer. Fields are only written by
/// the workflows in [`crate::session::BattleSession`].
#[derive(Debug, Default)]
pub struct ViewState {
    pub(super) connection: ConnectionStatus,
    pub(super) catalog: ModelCatalog,
    pub(super) samples: Vec<SampleText>,
    pub(super) model1: Option<String>,
    pub(super) model2: Option<String>,
    pub(super) input_text: String,
    pub(super) results: Option<ComparisonResult>,
    pub(super) loading: bool,
    pub(super) error: Option<String>,
    pub(super) ratings: RatingState,
    pub(super) init_generation: u64,
    pub(super) compare_generation: u64,
}

impl ViewState {
    pub fn connection(&self) -> ConnectionStatus {
        self.connection
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    pub fn samples(&self) -> &[SampleText] {
        &self.samples
    }

    pub fn selected_model(&self, side: Side) -> Option<&str> {
        match side {
            Side::Model1 => self.model1.as_deref(),
            Side::Model2 => self.model2.as_deref(),
        }
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub fn input_chars(&self) -> usize {
        self.input_text.chars().count()
    }

    pub fn word_count(&self) -> usize {
        self.input_text.split_whitespace().count()
    }

    pub fn results(&self) -> Option<&ComparisonResult> {
        self.results.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn ratings(&self) -> &RatingState {
        &self.ratings
    }

    pub(super) fn selected_slot(&mut self, side: Side) -> &mut Option<String> {
        match side {
            Side::Model1 => &mut self.model1,
            Side::Model2 => &mut self.model2,
        }
    }
}
