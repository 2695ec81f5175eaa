//! Post-processing: remove rows containing failed translations

use std::path::Path;

use tracing::info;

use crate::core::errors::Result;

/// Substring that marks a failed translation cell. Matched as a substring
/// so both the bare marker and its bracketed form are caught.
const FAILED_MARKER: &str = "Translation Failed";

/// Outcome of a filtering pass.
#[derive(Debug, Clone)]
pub struct FilterReport {
    /// Data rows read from the input file.
    pub total_rows: usize,
    /// Data rows dropped for containing the failure marker.
    pub dropped_rows: usize,
    /// Per-column failed-cell counts, in header order.
    pub failed_counts: Vec<(String, usize)>,
}

/// Drop every row in which any cell contains a failed translation.
///
/// Before filtering, a one-row summary holding the per-column failure
/// counts is appended, so the written file ends with those counts: rows
/// matching the marker never survive the filter, the numeric summary row
/// always does.
pub fn filter_failed(input: &Path, output: &Path) -> Result<FilterReport> {
    let mut reader = csv::Reader::from_path(input)?;
    let headers = reader.headers()?.clone();

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    let total_rows = rows.len();

    let failed_counts: Vec<(String, usize)> = headers
        .iter()
        .enumerate()
        .map(|(col, name)| {
            let count = rows
                .iter()
                .filter(|row| {
                    row.get(col)
                        .map(|cell| cell.contains(FAILED_MARKER))
                        .unwrap_or(false)
                })
                .count();
            (name.to_string(), count)
        })
        .collect();

    let summary_row: Vec<String> = failed_counts
        .iter()
        .map(|(_, count)| count.to_string())
        .collect();
    rows.push(summary_row);

    rows.retain(|row| !row.iter().any(|cell| cell.contains(FAILED_MARKER)));
    let dropped_rows = total_rows + 1 - rows.len();

    let mut writer = csv::Writer::from_path(output)?;
    writer.write_record(&headers)?;
    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    info!(
        "Filtered {} rows down to {} (plus summary row)",
        total_rows,
        rows.len().saturating_sub(1)
    );

    Ok(FilterReport {
        total_rows,
        dropped_rows,
        failed_counts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = "\
id,question,gpt-4o_japanese
1,first,こんにちは
2,second,[Translation Failed]
3,third,薬の説明
";

    #[test]
    fn test_filter_drops_failed_rows_and_appends_counts() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        let output = dir.path().join("out.csv");
        std::fs::write(&input, INPUT).unwrap();

        let report = filter_failed(&input, &output).unwrap();
        assert_eq!(report.total_rows, 3);
        assert_eq!(report.dropped_rows, 1);
        assert_eq!(
            report.failed_counts,
            vec![
                ("id".to_string(), 0),
                ("question".to_string(), 0),
                ("gpt-4o_japanese".to_string(), 1)
            ]
        );

        let mut reader = csv::Reader::from_path(&output).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

        // Two clean rows plus the summary row at the bottom.
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].get(0), Some("1"));
        assert_eq!(rows[1].get(0), Some("3"));
        assert_eq!(
            rows[2].iter().collect::<Vec<_>>(),
            vec!["0", "0", "1"]
        );
    }

    #[test]
    fn test_filter_with_no_failures_keeps_everything() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        let output = dir.path().join("out.csv");
        std::fs::write(&input, "id,text\n1,ok\n2,also ok\n").unwrap();

        let report = filter_failed(&input, &output).unwrap();
        assert_eq!(report.dropped_rows, 0);

        let mut reader = csv::Reader::from_path(&output).unwrap();
        assert_eq!(reader.records().count(), 3);
    }
}
