//! CSV report writing.
//!
//! One file per organization, named after the organization and the
//! generation time. Rows arrive already ordered (activity rows in ledger
//! insertion order, never-active members after them); this module only
//! formats and writes.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use report::{OrgName, ReportRow, Timestamp};

const HEADER: &str = "Users,Last activity,active";

/// Writes the report for `org` into `dir`, returning the file path.
pub fn write_report(
    dir: &Path,
    org: &OrgName,
    rows: &[ReportRow],
    generated_at: Timestamp,
) -> std::io::Result<PathBuf> {
    let stamp = generated_at.as_datetime().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("user_activity_report_{org}_{stamp}.csv"));

    let mut out = BufWriter::new(File::create(&path)?);
    writeln!(out, "{HEADER}")?;
    for row in rows {
        let last = row
            .last_activity
            .map_or_else(|| "N/A".to_string(), Timestamp::report_date);
        writeln!(
            out,
            "{},{},{}",
            field(row.user.as_str()),
            field(&last),
            row.status.report_value()
        )?;
    }
    out.flush()?;
    Ok(path)
}

/// Quotes a field when it carries a delimiter, quote, or line break.
fn field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}
