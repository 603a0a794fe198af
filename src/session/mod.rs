use crate::api::{BattleApi, CompareRequest, ComparisonResult, ModelCatalog, SampleText, Side};
use crate::errors::{ApiError, SessionError, ValidationError};

pub mod ratings;
pub mod store;

use ratings::Dimension;
use store::{ConnectionStatus, ViewState};

pub const MIN_TEXT_CHARS: usize = 50;
pub const MAX_TEXT_CHARS: usize = 10_000;

/// Data loaded once the backend answers its health check.
#[derive(Debug, Clone)]
pub struct InitialData {
    pub catalog: ModelCatalog,
    pub samples: Vec<SampleText>,
}

/// Issued by [`BattleSession::begin_initialize`]; stale tickets are ignored.
#[derive(Debug)]
#[must_use]
pub struct InitTicket {
    generation: u64,
}

/// Issued by [`BattleSession::begin_comparison`]; stale tickets are ignored.
#[derive(Debug)]
#[must_use]
pub struct ComparisonTicket {
    generation: u64,
    request: CompareRequest,
}

impl ComparisonTicket {
    pub fn request(&self) -> &CompareRequest {
        &self.request
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Failure(String),
}

pub struct BattleSession<A> {
    api: A,
    state: ViewState,
}

impl<A: BattleApi> BattleSession<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: ViewState::default(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn can_compare(&self) -> bool {
        let s = &self.state;
        s.connection == ConnectionStatus::Connected
            && !s.loading
            && s.model1.is_some()
            && s.model2.is_some()
            && s.input_chars() >= MIN_TEXT_CHARS
    }

    pub async fn initialize(&mut self) -> Result<(), ApiError> {
        let ticket = self.begin_initialize();
        let outcome = load_initial_data(&self.api).await;
        let failure = outcome.as_ref().err().cloned();
        self.finish_initialize(ticket, outcome);
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub fn begin_initialize(&mut self) -> InitTicket {
        self.state.init_generation += 1;
        self.state.connection = ConnectionStatus::Checking;
        self.state.error = None;
        tracing::info!(generation = self.state.init_generation, "connecting to backend");
        InitTicket {
            generation: self.state.init_generation,
        }
    }

    /// Applies the outcome unless a newer initialization was started. Returns
    /// whether the outcome was applied.
    pub fn finish_initialize(
        &mut self,
        ticket: InitTicket,
        outcome: Result<InitialData, ApiError>,
    ) -> bool {
        if ticket.generation != self.state.init_generation {
            tracing::debug!(
                ticket = ticket.generation,
                latest = self.state.init_generation,
                "discarding stale initialization response"
            );
            return false;
        }
        match outcome {
            Ok(data) => {
                tracing::info!(
                    models = data.catalog.iter().count(),
                    samples = data.samples.len(),
                    "backend connected"
                );
                self.state.catalog = data.catalog;
                self.state.samples = data.samples;
                self.state.connection = ConnectionStatus::Connected;
            }
            Err(e) => {
                tracing::warn!(error = %e, "backend connection failed");
                self.state.connection = ConnectionStatus::Error;
                self.state.error = Some(e.to_string());
            }
        }
        true
    }

    /// Whether text and selection edits are currently accepted.
    pub fn ensure_editable(&self) -> Result<(), SessionError> {
        if self.state.connection != ConnectionStatus::Connected {
            return Err(SessionError::NotConnected);
        }
        if self.state.loading {
            return Err(SessionError::Busy);
        }
        Ok(())
    }

    pub fn select_model(&mut self, side: Side, model_id: &str) -> Result<(), SessionError> {
        self.ensure_editable()?;
        if self.state.catalog.find(model_id).is_none() {
            return Err(SessionError::UnknownModel(model_id.to_string()));
        }
        *self.state.selected_slot(side) = Some(model_id.to_string());
        tracing::debug!(%side, model = model_id, "model selected");
        Ok(())
    }

    pub fn set_input_text(&mut self, text: &str) -> Result<(), SessionError> {
        self.ensure_editable()?;
        self.state.input_text = cap_text(text);
        Ok(())
    }

    pub fn clear_text(&mut self) -> Result<(), SessionError> {
        self.set_input_text("")
    }

    pub fn select_sample(&mut self, id: u32) -> Result<(), SessionError> {
        self.ensure_editable()?;
        let sample = self
            .state
            .samples
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(SessionError::UnknownSample(id))?;
        self.apply_sample(&sample);
        Ok(())
    }

    /// Fetches a sample by id from the backend and loads it like a listed one.
    pub async fn load_sample(&mut self, id: u32) -> Result<(), SessionError> {
        self.ensure_editable()?;
        match self.api.get_sample_text_by_id(id).await {
            Ok(sample) => {
                self.apply_sample(&sample);
                Ok(())
            }
            Err(e) => {
                self.state.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    fn apply_sample(&mut self, sample: &SampleText) {
        tracing::debug!(id = sample.id, title = %sample.title, "sample selected");
        self.state.input_text = cap_text(&sample.text);
        self.state.results = None;
        self.state.ratings.clear();
    }

    pub async fn compare(&mut self) -> Result<(), SessionError> {
        let ticket = self.begin_comparison()?;
        let outcome = self.api.compare_summaries(ticket.request()).await;
        let failure = outcome.as_ref().err().cloned();
        self.finish_comparison(ticket, outcome);
        match failure {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    /// Validates the form and moves into the loading state. Validation
    /// failures are recorded as the visible error.
    pub fn begin_comparison(&mut self) -> Result<ComparisonTicket, SessionError> {
        self.ensure_editable()?;
        let request = match self.validated_request() {
            Ok(r) => r,
            Err(e) => {
                self.state.error = Some(e.to_string());
                return Err(e.into());
            }
        };

        self.state.compare_generation += 1;
        self.state.loading = true;
        self.state.error = None;
        self.state.results = None;
        self.state.ratings.clear();
        tracing::info!(
            generation = self.state.compare_generation,
            model1 = %request.model1,
            model2 = %request.model2,
            chars = self.state.input_chars(),
            "battle started"
        );
        Ok(ComparisonTicket {
            generation: self.state.compare_generation,
            request,
        })
    }

    fn validated_request(&self) -> Result<CompareRequest, ValidationError> {
        let (Some(model1), Some(model2)) = (&self.state.model1, &self.state.model2) else {
            return Err(ValidationError::MissingModels);
        };
        if self.state.input_chars() < MIN_TEXT_CHARS {
            return Err(ValidationError::TextTooShort);
        }
        Ok(CompareRequest {
            text: self.state.input_text.clone(),
            model1: model1.clone(),
            model2: model2.clone(),
        })
    }

    /// Applies the outcome unless a newer comparison was started. Returns
    /// whether the outcome was applied.
    pub fn finish_comparison(
        &mut self,
        ticket: ComparisonTicket,
        outcome: Result<ComparisonResult, ApiError>,
    ) -> bool {
        if ticket.generation != self.state.compare_generation {
            tracing::debug!(
                ticket = ticket.generation,
                latest = self.state.compare_generation,
                "discarding stale comparison response"
            );
            return false;
        }
        self.state.loading = false;
        match outcome {
            Ok(result) => {
                tracing::info!(
                    model1_ok = result.model1.success,
                    model2_ok = result.model2.success,
                    "battle finished"
                );
                self.state.results = Some(result);
            }
            Err(e) => {
                tracing::warn!(error = %e, "battle failed");
                self.state.error = Some(e.to_string());
            }
        }
        true
    }

    pub fn rate(&mut self, side: Side, dimension: Dimension, value: u8) -> Result<(), SessionError> {
        if self.state.loading {
            return Err(SessionError::Busy);
        }
        let results = self.state.results.as_ref().ok_or(SessionError::NoResults)?;
        let outcome = results.outcome(side);
        if !outcome.success {
            return Err(SessionError::RatingDisabled(outcome.model_name.clone()));
        }
        if !(1..=ratings::MAX_STARS).contains(&value) {
            return Err(SessionError::RatingOutOfRange(value));
        }
        self.state.ratings.set(side, dimension, value);
        Ok(())
    }

    pub fn set_preference(&mut self, side: Side) -> Result<(), SessionError> {
        if self.state.loading {
            return Err(SessionError::Busy);
        }
        let results = self.state.results.as_ref().ok_or(SessionError::NoResults)?;
        if !results.both_succeeded() {
            return Err(SessionError::PreferenceUnavailable);
        }
        self.state.ratings.set_preference(side);
        Ok(())
    }

    /// One-shot cache clear. Never touches results or ratings.
    pub async fn clear_cache(&self) -> Notification {
        match self.api.clear_model_cache().await {
            Ok(ack) => {
                tracing::info!(ack = %ack.0, "model cache cleared");
                Notification::Success("Model cache cleared successfully!".into())
            }
            Err(e) => {
                tracing::warn!(error = %e, "cache clear failed");
                Notification::Failure(e.to_string())
            }
        }
    }
}

async fn load_initial_data<A: BattleApi>(api: &A) -> Result<InitialData, ApiError> {
    let health = api.health_check().await?;
    tracing::debug!(payload = %health.0, "backend healthy");
    let (catalog, samples) = tokio::join!(api.get_available_models(), api.get_sample_texts());
    Ok(InitialData {
        catalog: catalog?,
        samples: samples?,
    })
}

fn cap_text(text: &str) -> String {
    match text.char_indices().nth(MAX_TEXT_CHARS) {
        Some((idx, _)) => {
            tracing::warn!(limit = MAX_TEXT_CHARS, "input text truncated");
            text[..idx].to_string()
        }
        None => text.to_string(),
    }
}
