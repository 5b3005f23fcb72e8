//! Batch driver — normalizes every line of a document independently
//!
//! A failing line never stops the batch: its error is recorded in
//! [`BatchReport::failures`] and the remaining lines are processed.
//! Output order always follows document order.
//!
//! With a configured seed, line `i` uses seed `seed + i` (wrapping), so the
//! report is reproducible whether lines run sequentially or, with the
//! `parallel` feature, on the rayon pool.

use serde::Serialize;

use crate::document::Document;
use crate::geometry::Point;
use crate::normalizer::{normalize, NormalizationResult, NormalizeConfig};
use crate::{Error, Result};

/// One successfully normalized line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedLine {
    #[serde(flatten)]
    pub result: NormalizationResult,
    /// Position in the source document; absent for single-line documents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

/// A line that could not be normalized
#[derive(Debug, Clone, PartialEq)]
pub struct LineFailure {
    pub index: usize,
    pub error: Error,
}

/// Outcome of processing a whole document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchReport {
    pub lines: Vec<ProcessedLine>,
    pub failures: Vec<LineFailure>,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Pretty JSON array of the processed lines
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.lines)?)
    }
}

/// Normalize every line of `document`.
///
/// # Errors
/// Only a bad `config` fails the whole call; per-line errors land in the
/// report.
pub fn process_document(document: &Document, config: &NormalizeConfig) -> Result<BatchReport> {
    config.validate()?;

    let indexed = document.is_indexed();
    let lines = document.to_lines();
    log::info!("processing {} line(s)", lines.len());

    let outcomes = run_lines(lines, config);

    let mut report = BatchReport::default();
    for (index, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Ok(result) => report.lines.push(ProcessedLine {
                result,
                index: indexed.then_some(index),
            }),
            Err(error) => {
                log::warn!("line {} skipped: {}", index, error);
                report.failures.push(LineFailure { index, error });
            }
        }
    }

    Ok(report)
}

fn line_config(config: &NormalizeConfig, index: usize) -> NormalizeConfig {
    NormalizeConfig {
        seed: config.seed.map(|s| s.wrapping_add(index as u64)),
        ..config.clone()
    }
}

fn process_line(
    index: usize,
    line: Result<Vec<Point>>,
    config: &NormalizeConfig,
) -> Result<NormalizationResult> {
    let points = line?;
    normalize(&points, &line_config(config, index))
}

#[cfg(not(feature = "parallel"))]
fn run_lines(
    lines: Vec<Result<Vec<Point>>>,
    config: &NormalizeConfig,
) -> Vec<Result<NormalizationResult>> {
    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| process_line(i, line, config))
        .collect()
}

#[cfg(feature = "parallel")]
fn run_lines(
    lines: Vec<Result<Vec<Point>>>,
    config: &NormalizeConfig,
) -> Vec<Result<NormalizationResult>> {
    use rayon::prelude::*;

    lines
        .into_par_iter()
        .enumerate()
        .map(|(i, line)| process_line(i, line, config))
        .collect()
}
