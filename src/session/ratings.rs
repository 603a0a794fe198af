use crate::api::Side;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const MAX_STARS: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    Clarity,
    Accuracy,
    Conciseness,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [
        Dimension::Clarity,
        Dimension::Accuracy,
        Dimension::Conciseness,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Dimension::Clarity => "Clarity",
            Dimension::Accuracy => "Accuracy",
            Dimension::Conciseness => "Conciseness",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dimension::Clarity => "clarity",
            Dimension::Accuracy => "accuracy",
            Dimension::Conciseness => "conciseness",
        })
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clarity" => Ok(Dimension::Clarity),
            "accuracy" => Ok(Dimension::Accuracy),
            "conciseness" => Ok(Dimension::Conciseness),
            other => Err(format!(
                "unknown dimension '{other}' (expected clarity, accuracy or conciseness)"
            )),
        }
    }
}

/// Star ratings for both sides plus the overall winner. Lives only in the
/// client; nothing here is sent to the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RatingState {
    model1: BTreeMap<Dimension, u8>,
    model2: BTreeMap<Dimension, u8>,
    preference: Option<Side>,
}

impl RatingState {
    fn side(&self, side: Side) -> &BTreeMap<Dimension, u8> {
        match side {
            Side::Model1 => &self.model1,
            Side::Model2 => &self.model2,
        }
    }

    /// Replaces a single entry; every other entry is kept.
    pub fn set(&mut self, side: Side, dimension: Dimension, value: u8) {
        let entries = match side {
            Side::Model1 => &mut self.model1,
            Side::Model2 => &mut self.model2,
        };
        entries.insert(dimension, value);
    }

    /// Unset dimensions read as 0.
    pub fn score(&self, side: Side, dimension: Dimension) -> u8 {
        self.side(side).get(&dimension).copied().unwrap_or(0)
    }

    pub fn is_rated(&self, side: Side, dimension: Dimension) -> bool {
        self.side(side).contains_key(&dimension)
    }

    /// Mean of the non-zero scores rounded to one decimal, 0.0 when none are set.
    pub fn average(&self, side: Side) -> f64 {
        let scores: Vec<u8> = Dimension::ALL
            .iter()
            .map(|d| self.score(side, *d))
            .filter(|s| *s > 0)
            .collect();
        if scores.is_empty() {
            return 0.0;
        }
        let sum: u32 = scores.iter().map(|s| u32::from(*s)).sum();
        let mean = f64::from(sum) / scores.len() as f64;
        (mean * 10.0).round() / 10.0
    }

    pub fn preference(&self) -> Option<Side> {
        self.preference
    }

    pub fn set_preference(&mut self, side: Side) {
        self.preference = Some(side);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
