//! CSV storage gateway

use std::path::{Path, PathBuf};

use crate::core::errors::{Result, TranslationError};
use crate::core::models::{InputRecord, ResultRow};

/// Prefix for generated output filenames.
pub const OUTPUT_FILE_PREFIX: &str = "japanese_translations";

/// Source-text columns accepted in input files; the first non-empty cell
/// wins. The second name is kept for older dataset dumps.
const SOURCE_COLUMNS: &[&str] = &["harmful_medical_request", "question"];

/// Fixed leading output columns; model columns follow in registry order.
const BASE_COLUMNS: &[&str] = &["id", "category", "original_question"];

/// Read and validate an input dataset.
///
/// Row ids come from the `id` column when present and non-empty, otherwise
/// from the 1-based row position. Missing `category` cells read as empty.
pub fn read_input_file(path: &Path) -> Result<Vec<InputRecord>> {
    if !path.exists() {
        return Err(TranslationError::FileError {
            path: path.display().to_string(),
            message: "input file not found".to_string(),
        });
    }

    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let source_indices: Vec<usize> = SOURCE_COLUMNS
        .iter()
        .filter_map(|name| headers.iter().position(|h| h == *name))
        .collect();
    let id_index = headers.iter().position(|h| h == "id");
    let category_index = headers.iter().position(|h| h == "category");

    let mut records = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let row = row?;

        let question = source_indices
            .iter()
            .filter_map(|&i| row.get(i))
            .find(|value| !value.is_empty())
            .unwrap_or("")
            .to_string();

        let id = id_index
            .and_then(|i| row.get(i))
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| (idx + 1).to_string());

        let category = category_index
            .and_then(|i| row.get(i))
            .unwrap_or("")
            .to_string();

        records.push(InputRecord {
            id,
            category,
            question,
        });
    }

    Ok(records)
}

/// Write the full result snapshot, replacing any previous file.
///
/// Every snapshot is a complete table: the fixed header plus one rendered
/// row per accumulated result, so a checkpoint is always loadable on its
/// own. Writing the same rows twice produces identical bytes.
pub fn save_results(path: &Path, keys: &[String], rows: &[ResultRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header: Vec<String> = BASE_COLUMNS.iter().map(|c| (*c).to_string()).collect();
    header.extend(keys.iter().map(|key| format!("{key}_japanese")));
    writer.write_record(&header)?;

    for row in rows {
        let mut record = vec![row.id.clone(), row.category.clone(), row.question.clone()];
        for index in 0..keys.len() {
            record.push(row.cell_text(index).to_string());
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Timestamped default output filename.
pub fn generate_output_filename() -> String {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    format!("{OUTPUT_FILE_PREFIX}_{timestamp}.csv")
}

/// CSV files in a directory, sorted by name; used in not-found hints.
pub fn list_csv_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .into_iter()
        .flatten()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    files
}
