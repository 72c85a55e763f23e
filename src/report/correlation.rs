//! Tab-separated correlation report.

use crate::data::{CorrelationResult, CorrelationSet};
use crate::error::Result;
use std::io::Write;

/// Report header line.
pub const REPORT_HEADER: &str = "Gene\tPearsonR (p)\tSpearmanR (p)";

/// Field printed for both pairs of a degenerate column.
pub const DEGENERATE_FIELD: &str = "NA (DegenerateColumn)";

/// Format `value` like printf `%.3E`: three mantissa decimals, an upper-case
/// `E`, a signed exponent of at least two digits.
///
/// ```
/// use coexpr::report::format_scientific;
/// assert_eq!(format_scientific(0.0), "0.000E+00");
/// assert_eq!(format_scientific(0.0001234), "1.234E-04");
/// ```
pub fn format_scientific(value: f64) -> String {
    if value.is_nan() {
        return "NAN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "INF" } else { "-INF" }.to_string();
    }

    let formatted = format!("{:.3e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let exp: i32 = exponent.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}E{}{:02}", mantissa, sign, exp.abs())
        }
        None => formatted,
    }
}

fn format_pair(r: f64, p: f64) -> String {
    format!("{:.3} ({})", r, format_scientific(p))
}

/// One report line, without the trailing newline.
pub fn format_report_line(result: &CorrelationResult) -> String {
    match &result.stats {
        Some(s) => format!(
            "{}\t{}\t{}",
            result.gene_name,
            format_pair(s.pearson_r, s.pearson_p),
            format_pair(s.spearman_r, s.spearman_p)
        ),
        None => format!(
            "{}\t{}\t{}",
            result.gene_name, DEGENERATE_FIELD, DEGENERATE_FIELD
        ),
    }
}

/// Write the report: header, then one line per column in table order.
pub fn write_correlation_report<W: Write>(
    correlations: &CorrelationSet,
    writer: &mut W,
) -> Result<()> {
    writeln!(writer, "{}", REPORT_HEADER)?;
    for result in correlations.iter() {
        writeln!(writer, "{}", format_report_line(result))?;
    }
    Ok(())
}

/// Render the report as a string.
pub fn render_correlation_report(correlations: &CorrelationSet) -> String {
    let mut out = String::from(REPORT_HEADER);
    out.push('\n');
    for result in correlations.iter() {
        out.push_str(&format_report_line(result));
        out.push('\n');
    }
    out
}
