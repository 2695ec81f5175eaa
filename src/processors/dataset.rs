//! Batch dataset translation with periodic checkpointing

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::core::client::Translator;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{InputRecord, ResultRow};
use crate::storage::csv_store;

/// Whether a checkpoint is due after processing the row at `index`.
fn checkpoint_due(index: usize, interval: usize) -> bool {
    (index + 1) % interval == 0
}

/// Per-model count of successful translations across the result set.
fn success_counts(keys: &[String], rows: &[ResultRow]) -> Vec<(String, usize)> {
    keys.iter()
        .enumerate()
        .map(|(index, key)| {
            let count = rows
                .iter()
                .filter(|row| {
                    matches!(row.cells.get(index), Some(Some(outcome)) if outcome.is_translated())
                })
                .count();
            (key.clone(), count)
        })
        .collect()
}

/// Orchestrates a whole-dataset translation run.
///
/// Owns the only mutable result set; one record at a time, one model at a
/// time. Backend failures never stop the run — only input or checkpoint
/// I/O errors propagate.
#[derive(Debug, Clone)]
pub struct DatasetProcessor {
    translator: Translator,
    cancel: Arc<AtomicBool>,
}

impl DatasetProcessor {
    /// Create a new dataset processor
    pub fn new(translator: Translator) -> Self {
        Self {
            translator,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create from environment configuration
    pub fn from_env() -> Result<Self> {
        let translator = Translator::from_env()?;
        Ok(Self::new(translator))
    }

    /// Cancellation flag; set it to stop the run at the next record
    /// boundary. The in-flight record always completes its full fan-out
    /// first, so no appended row is ever partially translated.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Translate every record and checkpoint the result set to `output`.
    ///
    /// Appends one row per record in input order. Rows with blank source
    /// text skip the backends entirely and keep their empty placeholders.
    /// The full result set is rewritten every `save_interval` rows and once
    /// more after the loop; on cancellation that final write is still
    /// attempted before returning [`TranslationError::Interrupted`].
    pub async fn run(&self, records: &[InputRecord], output: &Path) -> Result<Vec<ResultRow>> {
        let keys = self.translator.model_keys();
        let save_interval = self.translator.config().save_interval;
        let total = records.len();

        info!("Starting translation of {} questions to Japanese", total);
        info!("Using models: {}", keys.join(", "));

        let pb = ProgressBar::new(total as u64);
        pb.set_style(ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .unwrap()
            .progress_chars("=>-"));

        let mut rows: Vec<ResultRow> = Vec::with_capacity(total);
        let mut interrupted = false;

        for (idx, record) in records.iter().enumerate() {
            if self.cancel.load(Ordering::SeqCst) {
                warn!("Interrupt observed, stopping after {} rows", rows.len());
                interrupted = true;
                break;
            }

            pb.set_message(format!("row {}/{}", idx + 1, total));
            info!("Processing row {}/{}", idx + 1, total);

            let mut row = ResultRow::skeleton(record, keys.len());

            if record.question.trim().is_empty() {
                info!("Skipping empty question at row {}", idx + 1);
            } else {
                let outcomes = self.translator.translate_all(&record.question).await;
                for (key, outcome) in outcomes {
                    if let Some(position) = keys.iter().position(|k| *k == key) {
                        row.cells[position] = Some(outcome);
                    }
                }
            }

            rows.push(row);
            pb.inc(1);

            if checkpoint_due(idx, save_interval) {
                csv_store::save_results(output, &keys, &rows)?;
                info!("Progress saved: {}/{} rows completed", idx + 1, total);
            }
        }

        // Final save; on interrupt it is best-effort only.
        let final_save = csv_store::save_results(output, &keys, &rows);
        if interrupted {
            pb.abandon_with_message("interrupted");
            if let Err(e) = &final_save {
                warn!("Final save after interrupt failed: {}", e);
            }
            return Err(TranslationError::Interrupted);
        }
        final_save?;
        pb.finish_with_message("completed");

        self.print_summary(&keys, &rows);
        Ok(rows)
    }

    /// Print per-model success rates for a finished run
    fn print_summary(&self, keys: &[String], rows: &[ResultRow]) {
        let total = rows.len();

        println!("\n{}", "=".repeat(50));
        println!("Translation Summary:");
        println!("Total rows: {}", total);

        for (key, count) in success_counts(keys, rows) {
            let rate = if total == 0 {
                0.0
            } else {
                count as f64 / total as f64 * 100.0
            };
            println!("{}: {}/{} successful ({:.1}%)", key, count, total, rate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::TranslatorConfig;
    use crate::core::models::TranslationOutcome;

    fn offline_processor(save_interval: usize) -> DatasetProcessor {
        let config = TranslatorConfig {
            api_key: "test_key".to_string(),
            api_endpoint: "http://127.0.0.1:9/v1/chat/completions".to_string(),
            models: TranslatorConfig::default_models(),
            rate_limit_delay_ms: 1,
            save_interval,
            ..Default::default()
        };
        DatasetProcessor::new(Translator::new(config).unwrap())
    }

    fn empty_record(id: &str) -> InputRecord {
        InputRecord {
            id: id.to_string(),
            category: "1".to_string(),
            question: "   ".to_string(),
        }
    }

    #[test]
    fn test_checkpoint_cadence() {
        // With interval 10 over 25 rows, checkpoints land after rows 10
        // and 20; the final save after the loop covers the rest.
        let due: Vec<usize> = (0..25).filter(|&i| checkpoint_due(i, 10)).collect();
        assert_eq!(due, vec![9, 19]);
    }

    #[test]
    fn test_success_counts() {
        let keys = vec!["a".to_string(), "b".to_string()];
        let record = InputRecord {
            id: "1".to_string(),
            category: String::new(),
            question: "q".to_string(),
        };

        let mut rows = Vec::new();
        for i in 0..10 {
            let mut row = ResultRow::skeleton(&record, 2);
            row.cells[0] = Some(if i < 7 {
                TranslationOutcome::Translated("译".to_string())
            } else {
                TranslationOutcome::Failed
            });
            rows.push(row);
        }

        let counts = success_counts(&keys, &rows);
        assert_eq!(counts[0], ("a".to_string(), 7));
        // Cells never attempted do not count as successes.
        assert_eq!(counts[1], ("b".to_string(), 0));
    }

    #[tokio::test]
    async fn test_blank_questions_skip_backends_and_still_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.csv");
        let processor = offline_processor(2);

        let records = vec![empty_record("1"), empty_record("2"), empty_record("3")];
        let rows = processor.run(&records, &output).await.unwrap();

        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.cells.iter().all(Option::is_none)));

        // The snapshot on disk is a complete table in input order.
        let mut reader = csv::Reader::from_path(&output).unwrap();
        let ids: Vec<String> = reader
            .records()
            .map(|r| r.unwrap().get(0).unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_pre_set_cancel_saves_and_reports_interrupt() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.csv");
        let processor = offline_processor(10);

        processor.cancel_flag().store(true, Ordering::SeqCst);
        let records = vec![empty_record("1")];
        let result = processor.run(&records, &output).await;

        assert!(matches!(result, Err(TranslationError::Interrupted)));
        // Best-effort save still produced a valid, empty snapshot.
        let mut reader = csv::Reader::from_path(&output).unwrap();
        assert_eq!(reader.records().count(), 0);
    }
}
