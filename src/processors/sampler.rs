//! Deterministic category-balanced sampling of the benchmark corpus

use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;

use crate::core::errors::{Result, TranslationError};

/// Fixed RNG seed so repeated runs draw the same sample.
const SAMPLE_SEED: u64 = 32;

/// Number of benchmark categories.
const CATEGORY_COUNT: usize = 9;

/// Base draw per category.
const SAMPLES_PER_CATEGORY: usize = 44;

/// The first `EXTRA_SAMPLES` categories draw one additional row.
const EXTRA_SAMPLES: usize = 4;

/// Outcome of a sampling pass.
#[derive(Debug, Clone)]
pub struct SampleReport {
    /// Total rows written.
    pub total: usize,
    /// Rows drawn per category, in category order.
    pub per_category: Vec<(usize, usize)>,
}

/// Draw a category-balanced sample and write it as one shuffled CSV.
///
/// Reads `med_safety_demonstrations_category_<n>.csv` for each category
/// under `data_dir`, draws the per-category quota without replacement,
/// tags each row with its category, shuffles the pooled sample, and writes
/// it with `category` as the first column. A category file with fewer rows
/// than its quota contributes everything it has.
pub fn sample_dataset(data_dir: &Path, output: &Path) -> Result<SampleReport> {
    let mut rng = StdRng::seed_from_u64(SAMPLE_SEED);

    let mut header_tail: Option<Vec<String>> = None;
    let mut samples: Vec<(usize, Vec<String>)> = Vec::new();
    let mut per_category = Vec::new();

    for category in 1..=CATEGORY_COUNT {
        let path = data_dir.join(format!(
            "med_safety_demonstrations_category_{category}.csv"
        ));
        if !path.exists() {
            return Err(TranslationError::FileError {
                path: path.display().to_string(),
                message: "category file not found".to_string(),
            });
        }

        let mut reader = csv::Reader::from_path(&path)?;
        let file_headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        // An existing category column is replaced by ours.
        let skip_index = file_headers.iter().position(|h| h == "category");

        if header_tail.is_none() {
            header_tail = Some(
                file_headers
                    .iter()
                    .filter(|h| h.as_str() != "category")
                    .cloned()
                    .collect(),
            );
        }

        let mut rows: Vec<Vec<String>> = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        let quota = SAMPLES_PER_CATEGORY + usize::from(category <= EXTRA_SAMPLES);
        let drawn: Vec<Vec<String>> = rows
            .choose_multiple(&mut rng, quota.min(rows.len()))
            .cloned()
            .collect();
        per_category.push((category, drawn.len()));

        for row in drawn {
            let fields: Vec<String> = row
                .into_iter()
                .enumerate()
                .filter(|(index, _)| Some(*index) != skip_index)
                .map(|(_, value)| value)
                .collect();
            samples.push((category, fields));
        }
    }

    samples.shuffle(&mut rng);

    let mut writer = csv::Writer::from_path(output)?;
    let mut header = vec!["category".to_string()];
    header.extend(header_tail.unwrap_or_default());
    writer.write_record(&header)?;

    for (category, fields) in &samples {
        let mut record = vec![category.to_string()];
        record.extend(fields.iter().cloned());
        writer.write_record(&record)?;
    }
    writer.flush()?;

    info!(
        "Sampled {} rows across {} categories",
        samples.len(),
        CATEGORY_COUNT
    );

    Ok(SampleReport {
        total: samples.len(),
        per_category,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_corpus(dir: &Path, rows_per_category: usize) {
        for category in 1..=CATEGORY_COUNT {
            let path = dir.join(format!(
                "med_safety_demonstrations_category_{category}.csv"
            ));
            let mut body = String::from("id,harmful_medical_request\n");
            for row in 0..rows_per_category {
                body.push_str(&format!("{category}-{row},request {category}-{row}\n"));
            }
            std::fs::write(path, body).unwrap();
        }
    }

    #[test]
    fn test_sample_quotas_and_header() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(dir.path(), 50);
        let output = dir.path().join("sample.csv");

        let report = sample_dataset(dir.path(), &output).unwrap();
        assert_eq!(report.total, CATEGORY_COUNT * SAMPLES_PER_CATEGORY + EXTRA_SAMPLES);
        assert_eq!(report.per_category[0], (1, 45));
        assert_eq!(report.per_category[8], (9, 44));

        let mut reader = csv::Reader::from_path(&output).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, vec!["category", "id", "harmful_medical_request"]);
        assert_eq!(reader.records().count(), report.total);
    }

    #[test]
    fn test_sample_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(dir.path(), 50);
        let first = dir.path().join("first.csv");
        let second = dir.path().join("second.csv");

        sample_dataset(dir.path(), &first).unwrap();
        sample_dataset(dir.path(), &second).unwrap();

        assert_eq!(
            std::fs::read(&first).unwrap(),
            std::fs::read(&second).unwrap()
        );
    }

    #[test]
    fn test_short_category_contributes_what_it_has() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(dir.path(), 10);
        let output = dir.path().join("sample.csv");

        let report = sample_dataset(dir.path(), &output).unwrap();
        assert!(report.per_category.iter().all(|(_, n)| *n == 10));
    }

    #[test]
    fn test_missing_category_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("sample.csv");
        assert!(matches!(
            sample_dataset(dir.path(), &output),
            Err(TranslationError::FileError { .. })
        ));
    }
}
