use crate::error::Result;
use crate::scoring::{Answer, TrialResult};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    started_at: String,
    trial: usize,
    word: &'a str,
    rule: &'a str,
    correct_answer: Answer,
    user_answer: Answer,
    correct: bool,
    rt_ms: u64,
    is_switch: bool,
}

/// Write one CSV row per answered trial, numbered from 1, to `path`
pub fn write_results<P: AsRef<Path>>(
    path: P,
    started_at: DateTime<Local>,
    results: &[TrialResult],
) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    let stamp = started_at.to_rfc3339();

    for r in results {
        writer.serialize(ExportRow {
            started_at: stamp.clone(),
            trial: r.trial_index + 1,
            word: &r.word,
            rule: r.rule.id(),
            correct_answer: r.correct_answer,
            user_answer: r.user_answer,
            correct: r.correct,
            rt_ms: r.response_time_ms,
            is_switch: r.is_switch,
        })?;
    }

    writer.flush()?;
    Ok(())
}
