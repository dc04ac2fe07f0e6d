pub mod export;
pub mod formatter;

pub use export::{export_results, ExportFormat};
pub use formatter::{
    column_headers, format_explain, format_metric, format_results_table, format_tsv, row_fields,
    should_use_colors, ScoreBand, NOT_AVAILABLE,
};
