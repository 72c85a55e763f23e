//! Output artifacts: correlation report, run log and atomic file writes.

mod atomic;
mod correlation;
mod run_log;

pub use atomic::{commit_all, write_atomic, StagedFile, StagedWriter};
pub use correlation::{
    format_report_line, format_scientific, render_correlation_report, write_correlation_report,
    DEGENERATE_FIELD, REPORT_HEADER,
};
pub use run_log::RunLog;
