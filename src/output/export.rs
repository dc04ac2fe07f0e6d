use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::Path;

use super::formatter::{column_headers, row_fields};
use crate::scoring::ScoreResult;

/// File format for exported results, picked from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Tsv,
    Json,
}

impl ExportFormat {
    /// `.json` and `.tsv` are recognized; anything else is CSV
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => ExportFormat::Json,
            Some("tsv") | Some("tab") => ExportFormat::Tsv,
            _ => ExportFormat::Csv,
        }
    }
}

/// Write results to `path` atomically, one row per result.
///
/// CSV/TSV files carry the same columns as the table plus an Error column;
/// unavailable metrics are written as "N/A". JSON is an array of results.
pub fn export_results(path: &Path, results: &[ScoreResult]) -> Result<ExportFormat> {
    let format = ExportFormat::from_path(path);

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open {} for writing", path.display()))?;

    match format {
        ExportFormat::Csv => write_delimited(&mut file, results, b',')?,
        ExportFormat::Tsv => write_delimited(&mut file, results, b'\t')?,
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut file, results)
                .context("Failed to serialize results")?;
            file.write_all(b"\n")?;
        }
    }

    file.commit()
        .with_context(|| format!("Failed to save {}", path.display()))?;

    Ok(format)
}

fn write_delimited<W: Write>(writer: W, results: &[ScoreResult], delimiter: u8) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    csv_writer
        .write_record(column_headers())
        .context("Failed to write header")?;
    for result in results {
        csv_writer
            .write_record(row_fields(result))
            .with_context(|| format!("Failed to write row for {}", result.ticker))?;
    }
    csv_writer.flush().context("Failed to flush export")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{calculate_score, RawMetrics, ScoringConfig};
    use std::env;
    use std::path::PathBuf;

    fn sample_results() -> Vec<ScoreResult> {
        let raw = RawMetrics {
            pe: Some(15.0),
            pb: Some(2.0),
            roe: Some(0.20),
            debt_to_equity: Some(50.0),
            eps_growth_5y: Some(12.0),
            operating_margin: Some(15.0),
        };
        vec![
            calculate_score("EQNR.OL", &raw, &ScoringConfig::default()),
            ScoreResult::failed("NOPE.OL", "Ticker not found: Quote not found, symbol NOPE.OL"),
        ]
    }

    fn temp_path(name: &str) -> PathBuf {
        let path = env::temp_dir().join(name);
        let _ = std::fs::remove_file(&path);
        path
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ExportFormat::from_path(Path::new("out.csv")), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_path(Path::new("out.JSON")), ExportFormat::Json);
        assert_eq!(ExportFormat::from_path(Path::new("out.tsv")), ExportFormat::Tsv);
        assert_eq!(ExportFormat::from_path(Path::new("out.xlsx")), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_path(Path::new("results")), ExportFormat::Csv);
    }

    #[test]
    fn test_export_csv() {
        let path = temp_path("buffett_score_test_export.csv");
        let format = export_results(&path, &sample_results()).unwrap();
        assert_eq!(format, ExportFormat::Csv);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Ticker,P/E,P/B,ROE (%),EPS growth 5y (%),Debt/Equity,Op. Margin (%),Buffett Score (0–6),Error"
        );
        assert_eq!(lines[1], "EQNR.OL,15.00,2.00,20.00,12.00,50.00,15.00,6,");
        // Error contains a comma, so it is quoted
        assert_eq!(
            lines[2],
            "NOPE.OL,N/A,N/A,N/A,N/A,N/A,N/A,0,\"Ticker not found: Quote not found, symbol NOPE.OL\""
        );

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_export_tsv() {
        let path = temp_path("buffett_score_test_export.tsv");
        export_results(&path, &sample_results()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Ticker\tP/E\t"));
        assert!(lines[1].starts_with("EQNR.OL\t15.00\t"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_export_json() {
        let path = temp_path("buffett_score_test_export.json");
        let format = export_results(&path, &sample_results()).unwrap();
        assert_eq!(format, ExportFormat::Json);

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
        let rows = parsed.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["ticker"], "EQNR.OL");
        assert_eq!(rows[0]["score"], 6);
        assert!(rows[1]["metrics"]["pe"].is_null());
        assert!(rows[1]["error"].as_str().unwrap().starts_with("Ticker not found"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_export_empty_results() {
        let path = temp_path("buffett_score_test_export_empty.csv");
        export_results(&path, &[]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);

        let _ = std::fs::remove_file(&path);
    }
}
