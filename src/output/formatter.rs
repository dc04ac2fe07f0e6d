use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::scoring::{Metric, ScoreResult, MAX_SCORE};

pub const TICKER_COLUMN: &str = "Ticker";
pub const SCORE_COLUMN: &str = "Buffett Score (0–6)";
pub const ERROR_COLUMN: &str = "Error";

/// Marker for a metric the providers could not supply
pub const NOT_AVAILABLE: &str = "N/A";

const SEPARATOR: &str = "  ";

/// Shortest error text kept when truncating to the terminal width
const MIN_ERROR_WIDTH: usize = 20;

/// Color key for a score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Strong,   // 5-6
    Moderate, // 3-4
    Weak,     // 0-2
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=2 => ScoreBand::Weak,
            3..=4 => ScoreBand::Moderate,
            _ => ScoreBand::Strong,
        }
    }

    fn paint(&self, text: &str) -> String {
        match self {
            ScoreBand::Strong => text.green().bold().to_string(),
            ScoreBand::Moderate => text.yellow().to_string(),
            ScoreBand::Weak => text.red().to_string(),
        }
    }
}

/// Check if stdout is a TTY and NO_COLOR is unset
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Two decimals, or "N/A" when unavailable
pub fn format_metric(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Export/TSV column headings, in order
pub fn column_headers() -> Vec<&'static str> {
    let mut headers = vec![TICKER_COLUMN];
    headers.extend(Metric::ALL.iter().map(|m| m.label()));
    headers.push(SCORE_COLUMN);
    headers.push(ERROR_COLUMN);
    headers
}

/// One export/TSV row matching [`column_headers`]
pub fn row_fields(result: &ScoreResult) -> Vec<String> {
    let mut fields = vec![result.ticker.clone()];
    fields.extend(
        Metric::ALL
            .iter()
            .map(|m| format_metric(result.metrics.get(*m))),
    );
    fields.push(result.score.to_string());
    fields.push(result.error.clone().unwrap_or_default());
    fields
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate_text(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format results as an aligned table with a header row.
/// Columns: Ticker, the six metrics, score, and an Error column when any
/// row failed.
pub fn format_results_table(results: &[ScoreResult], use_colors: bool) -> String {
    if results.is_empty() {
        return "No tickers to analyze.".to_string();
    }

    let mut headers = vec![TICKER_COLUMN];
    headers.extend(Metric::ALL.iter().map(|m| m.label()));
    headers.push(SCORE_COLUMN);

    let rows: Vec<Vec<String>> = results
        .iter()
        .map(|result| {
            let mut cells = vec![result.ticker.clone()];
            cells.extend(
                Metric::ALL
                    .iter()
                    .map(|m| format_metric(result.metrics.get(*m))),
            );
            cells.push(result.score.to_string());
            cells
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            rows.iter()
                .map(|row| row[col].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();
    let table_width =
        widths.iter().sum::<usize>() + SEPARATOR.len() * (widths.len().saturating_sub(1));

    let mut header_line = headers
        .iter()
        .zip(&widths)
        .enumerate()
        .map(|(col, (header, width))| {
            let cell = pad(header, *width, col == 0);
            if use_colors {
                cell.bold().to_string()
            } else {
                cell
            }
        })
        .collect::<Vec<_>>()
        .join(SEPARATOR);

    if results.iter().any(ScoreResult::is_failed) {
        header_line.push_str(SEPARATOR);
        if use_colors {
            header_line.push_str(&ERROR_COLUMN.bold().to_string());
        } else {
            header_line.push_str(ERROR_COLUMN);
        }
    }

    let term_width = get_terminal_width();
    let score_col = headers.len() - 1;

    let mut lines = vec![header_line];
    for (result, row) in results.iter().zip(&rows) {
        let mut line = row
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(col, (cell, width))| {
                let padded = pad(cell, *width, col == 0);
                if !use_colors {
                    padded
                } else if col == score_col {
                    ScoreBand::from_score(result.score).paint(&padded)
                } else if cell == NOT_AVAILABLE {
                    padded.dimmed().to_string()
                } else {
                    padded
                }
            })
            .collect::<Vec<_>>()
            .join(SEPARATOR);

        if let Some(error) = &result.error {
            let error = match term_width {
                Some(width) => {
                    let available = width.saturating_sub(table_width + SEPARATOR.len());
                    truncate_text(error, available.max(MIN_ERROR_WIDTH))
                }
                None => error.clone(),
            };
            line.push_str(SEPARATOR);
            if use_colors {
                line.push_str(&error.red().to_string());
            } else {
                line.push_str(&error);
            }
        }

        lines.push(line);
    }

    lines.join("\n")
}

fn pad(cell: &str, width: usize, left: bool) -> String {
    if left {
        format!("{:<width$}", cell, width = width)
    } else {
        format!("{:>width$}", cell, width = width)
    }
}

/// Format results as tab-separated values for scripting.
/// Header row plus one row per result, no colors.
pub fn format_tsv(results: &[ScoreResult]) -> String {
    std::iter::once(column_headers().join("\t"))
        .chain(results.iter().map(|r| row_fields(r).join("\t")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Per-check breakdown for one result (verbose `--explain` view)
pub fn format_explain(result: &ScoreResult, use_colors: bool) -> String {
    let score = format!("{}/{}", result.score, MAX_SCORE);
    let score = if use_colors {
        ScoreBand::from_score(result.score).paint(&score)
    } else {
        score
    };
    let mut lines = vec![format!("{}  {}", result.ticker, score)];

    if let Some(error) = &result.error {
        lines.push(format!("  Error: {}", error));
        return lines.join("\n");
    }

    let label_width = Metric::ALL
        .iter()
        .map(|m| m.label().chars().count())
        .max()
        .unwrap_or(0);

    for check in &result.checks {
        let points = if check.passed { "+1" } else { " 0" };
        lines.push(format!(
            "  {:<label_width$}  {:>10}  {:<6}  {}",
            check.metric.label(),
            format_metric(check.value.map(crate::scoring::metrics::round2)),
            check.threshold.to_string(),
            points,
            label_width = label_width
        ));
    }

    lines.join("\n")
}
