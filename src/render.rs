//! Plain-text views of the session state. Every function here is a pure
//! function of [`ViewState`].

use crate::api::model::{ModelDescriptor, ModelOutcome};
use crate::api::{ModelCatalog, SampleText, Side};
use crate::session::ratings::{Dimension, RatingState, MAX_STARS};
use crate::session::store::{ConnectionStatus, ViewState};
use crate::session::{MAX_TEXT_CHARS, MIN_TEXT_CHARS};
use std::fmt::Write;

const BAR_WIDTH: usize = 10;
const PREVIEW_CHARS: usize = 72;

pub fn connection_gate(state: &ViewState) -> String {
    match state.connection() {
        ConnectionStatus::Checking => "Connecting to Battle API...".to_string(),
        ConnectionStatus::Connected => format!(
            "Battle of the LLMs: connected ({} models, {} sample texts)",
            state.catalog().iter().count(),
            state.samples().len()
        ),
        ConnectionStatus::Error => format!(
            "Backend Connection Failed: {}\nType `retry` to reconnect.",
            state.error().unwrap_or("unknown error")
        ),
    }
}

fn model_group(out: &mut String, title: &str, models: &[ModelDescriptor]) {
    if models.is_empty() {
        return;
    }
    let _ = writeln!(out, "  {title}");
    for m in models {
        let _ = writeln!(out, "    {:<28} {}", m.id, m.name);
    }
}

pub fn model_list(catalog: &ModelCatalog) -> String {
    if catalog.is_empty() {
        return "No models available\n".to_string();
    }
    let mut out = String::new();
    model_group(&mut out, "Closed Source (API)", &catalog.closed_source);
    model_group(&mut out, "Open Source (Local)", &catalog.open_source);
    out
}

pub fn selection(state: &ViewState) -> String {
    let mut out = String::new();
    for side in Side::BOTH {
        let chosen = match state.selected_model(side) {
            Some(id) => match state.catalog().find(id) {
                Some(m) => format!("{} ({})", m.name, m.id),
                None => id.to_string(),
            },
            None => "Select a model...".to_string(),
        };
        let _ = writeln!(out, "{}: {}", side.label(), chosen);
    }
    out
}

pub fn sample_list(samples: &[SampleText]) -> String {
    if samples.is_empty() {
        return "No sample texts available\n".to_string();
    }
    samples
        .iter()
        .map(|s| format!("  [{}] {} - {}\n", s.id, s.category, s.title))
        .collect()
}

pub fn text_input(state: &ViewState) -> String {
    let chars = state.input_chars();
    let gate = if chars >= MIN_TEXT_CHARS {
        "ok"
    } else {
        "too short"
    };
    format!(
        "{} words | {}/{} characters | minimum {} characters: {}\n",
        state.word_count(),
        chars,
        MAX_TEXT_CHARS,
        MIN_TEXT_CHARS,
        gate
    )
}

/// First line of the input text, shortened for display.
pub fn text_preview(state: &ViewState) -> String {
    let first = state.input_text().lines().find(|l| !l.trim().is_empty());
    match first {
        None => "(no input text)\n".to_string(),
        Some(line) => {
            let line = line.trim();
            let shown: String = line.chars().take(PREVIEW_CHARS).collect();
            if shown.len() < line.len() {
                format!("> {shown}...\n")
            } else {
                format!("> {shown}\n")
            }
        }
    }
}

pub fn stars(score: u8) -> String {
    let filled = usize::from(score.min(MAX_STARS));
    format!(
        "{}{}",
        "★".repeat(filled),
        "☆".repeat(usize::from(MAX_STARS) - filled)
    )
}

fn processing_time(time: Option<f64>) -> String {
    match time {
        Some(t) if t > 0.0 => format!("{t}s"),
        _ => "-".to_string(),
    }
}

fn outcome_panel(out: &mut String, side: Side, outcome: &ModelOutcome, ratings: &RatingState) {
    let status = if outcome.success { "ok" } else { "failed" };
    let _ = writeln!(
        out,
        "== {}: {} [{}] {}",
        side.label(),
        outcome.model_name,
        status,
        processing_time(outcome.processing_time)
    );
    let _ = writeln!(out, "{}", outcome.summary.trim());
    if let Some(err) = &outcome.error {
        let _ = writeln!(out, "error: {err}");
    }
    if outcome.success {
        for dim in Dimension::ALL {
            let _ = writeln!(
                out,
                "  {:<12} {}",
                dim.label(),
                stars(ratings.score(side, dim))
            );
        }
    } else {
        let _ = writeln!(out, "  rating disabled");
    }
}

pub fn results_panel(state: &ViewState) -> String {
    if state.is_loading() {
        return "Battle in progress...\n".to_string();
    }
    let Some(results) = state.results() else {
        return "Select your models and input text to compare summaries\n".to_string();
    };
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} words • {} characters",
        results.word_count, results.text_length
    );
    for side in Side::BOTH {
        outcome_panel(&mut out, side, results.outcome(side), state.ratings());
    }
    out
}

fn bar(score: u8) -> String {
    let filled = usize::from(score) * BAR_WIDTH / usize::from(MAX_STARS);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// Empty when there is nothing to chart yet.
pub fn rating_chart(state: &ViewState) -> String {
    let Some(results) = state.results() else {
        return String::new();
    };
    let ratings = state.ratings();
    let mut out = String::new();
    let _ = writeln!(out, "Rating Comparison");
    for side in Side::BOTH {
        let _ = writeln!(
            out,
            "  {:<24} average {:.1}/5",
            results.outcome(side).model_name,
            ratings.average(side)
        );
    }
    for dim in Dimension::ALL {
        let _ = writeln!(out, "  {}", dim.label());
        for side in Side::BOTH {
            let score = ratings.score(side, dim);
            let shown = if ratings.is_rated(side, dim) {
                score.to_string()
            } else {
                "-".to_string()
            };
            let _ = writeln!(
                out,
                "    {:<22} {} {}",
                results.outcome(side).model_name,
                bar(score),
                shown
            );
        }
    }
    if let Some(winner) = ratings.preference() {
        let _ = writeln!(
            out,
            "  Preferred: 🏆 {}",
            results.outcome(winner).model_name
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stars_fill_from_the_left() {
        assert_eq!(stars(0), "☆☆☆☆☆");
        assert_eq!(stars(3), "★★★☆☆");
        assert_eq!(stars(9), "★★★★★");
    }

    #[test]
    fn bars_scale_to_five_stars() {
        assert_eq!(bar(0), "░".repeat(BAR_WIDTH));
        assert_eq!(bar(5), "█".repeat(BAR_WIDTH));
        assert_eq!(bar(2).chars().filter(|c| *c == '█').count(), 4);
    }

    #[test]
    fn zero_or_missing_processing_time_shows_dash() {
        assert_eq!(processing_time(None), "-");
        assert_eq!(processing_time(Some(0.0)), "-");
        assert_eq!(processing_time(Some(1.2)), "1.2s");
    }

    #[test]
    fn empty_state_renders_placeholders() {
        let state = ViewState::default();
        assert_eq!(connection_gate(&state), "Connecting to Battle API...");
        assert!(results_panel(&state).starts_with("Select your models"));
        assert!(rating_chart(&state).is_empty());
        assert!(selection(&state).contains("Fighter 1: Select a model..."));
        assert_eq!(text_preview(&state), "(no input text)\n");
        assert_eq!(
            text_input(&state),
            "0 words | 0/10000 characters | minimum 50 characters: too short\n"
        );
    }

    #[test]
    fn empty_groups_are_not_listed() {
        let catalog = ModelCatalog {
            closed_source: vec![ModelDescriptor {
                id: "gpt-x".into(),
                name: "GPT X".into(),
            }],
            open_source: vec![],
        };
        let listing = model_list(&catalog);
        assert!(listing.contains("Closed Source (API)"));
        assert!(!listing.contains("Open Source"));
        assert_eq!(model_list(&ModelCatalog::default()), "No models available\n");
    }

    #[test]
    fn samples_show_category_and_title() {
        let samples = vec![SampleText {
            id: 2,
            category: "News".into(),
            title: "Climate Summit".into(),
            text: "...".into(),
        }];
        assert_eq!(sample_list(&samples), "  [2] News - Climate Summit\n");
    }
}
