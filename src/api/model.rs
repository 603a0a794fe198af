use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub id: String,
    pub name: String,
}

/// Models offered by the backend. The grouping is only used for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCatalog {
    #[serde(default)]
    pub closed_source: Vec<ModelDescriptor>,
    #[serde(default)]
    pub open_source: Vec<ModelDescriptor>,
}

impl ModelCatalog {
    pub fn iter(&self) -> impl Iterator<Item = &ModelDescriptor> {
        self.closed_source.iter().chain(self.open_source.iter())
    }

    pub fn find(&self, id: &str) -> Option<&ModelDescriptor> {
        self.iter().find(|m| m.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.closed_source.is_empty() && self.open_source.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleText {
    pub id: u32,
    pub category: String,
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareRequest {
    pub text: String,
    pub model1: String,
    pub model2: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelOutcome {
    pub model_name: String,
    pub summary: String,
    #[serde(default)]
    pub processing_time: Option<f64>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub word_count: u64,
    pub text_length: u64,
    pub model1: ModelOutcome,
    pub model2: ModelOutcome,
}

impl ComparisonResult {
    pub fn outcome(&self, side: Side) -> &ModelOutcome {
        match side {
            Side::Model1 => &self.model1,
            Side::Model2 => &self.model2,
        }
    }

    pub fn both_succeeded(&self) -> bool {
        self.model1.success && self.model2.success
    }
}

/// Opaque payload of `GET /health`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct HealthStatus(pub serde_json::Value);

/// Opaque payload of `POST /clear-cache`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct CacheCleared(pub serde_json::Value);

/// Error body a failing endpoint may carry.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}

/// One of the two contenders of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Model1,
    Model2,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Model1, Side::Model2];

    pub fn label(self) -> &'static str {
        match self {
            Side::Model1 => "Fighter 1",
            Side::Model2 => "Fighter 2",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Model1 => "model1",
            Side::Model2 => "model2",
        })
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "model1" => Ok(Side::Model1),
            "2" | "model2" => Ok(Side::Model2),
            other => Err(format!("expected 1 or 2, got '{other}'")),
        }
    }
}
