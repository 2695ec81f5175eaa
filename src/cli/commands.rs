//! CLI command definitions and handlers

use clap::Subcommand;
use std::path::{Path, PathBuf};

use crate::core::errors::{Result, TranslationError};

/// Commands for the medical safety translation tool
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate the input dataset with every configured model
    Translate {
        /// Input CSV file path
        #[arg(short, long, default_value = "med_safety_sample_300.csv")]
        input: PathBuf,

        /// Output CSV file path (default: auto-generated with timestamp)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip the confirmation prompt before making paid API calls
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Remove rows containing failed translations from a results file
    Filter {
        /// Results CSV to filter
        #[arg(short, long)]
        input: PathBuf,

        /// Destination for the filtered CSV
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Draw a category-balanced sample from the benchmark corpus
    Sample {
        /// Directory holding the per-category benchmark CSV files
        #[arg(short, long, default_value = "datasets/train/gpt4")]
        data_dir: PathBuf,

        /// Destination for the sampled CSV
        #[arg(short, long, default_value = "med_safety_sample_300.csv")]
        output: PathBuf,
    },
}

/// Handle dataset translation command
pub async fn handle_translate(
    input: PathBuf,
    output: Option<PathBuf>,
    yes: bool,
) -> Result<()> {
    use crate::core::client::Translator;
    use crate::core::config::TranslatorConfig;
    use crate::processors::dataset::DatasetProcessor;
    use crate::storage::csv_store;
    use std::sync::atomic::Ordering;

    // Credentials are checked before any file or network I/O.
    let config = TranslatorConfig::load()?;

    let output =
        output.unwrap_or_else(|| PathBuf::from(csv_store::generate_output_filename()));

    println!("Medical Safety Japanese Translation Tool");
    println!("{}", "=".repeat(50));
    println!("Input file: {}", input.display());
    println!("Output file: {}", output.display());
    println!("Target language: Japanese");
    println!("Models: {}", config.model_keys().join(", "));
    println!("{}", "=".repeat(50));

    if !input.exists() {
        let dir = input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        println!("\nAvailable CSV files in {}:", dir.display());
        for candidate in csv_store::list_csv_files(dir) {
            if let Some(name) = candidate.file_name() {
                println!("  - {}", name.to_string_lossy());
            }
        }
        return Err(TranslationError::FileError {
            path: input.display().to_string(),
            message: "input file not found".to_string(),
        });
    }

    if !yes && !confirm_start()? {
        println!("Translation cancelled.");
        return Ok(());
    }

    let records = csv_store::read_input_file(&input)?;
    let translator = Translator::new(config)?;
    let processor = DatasetProcessor::new(translator);

    let cancel = processor.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nInterrupt received, finishing the current row before saving...");
            cancel.store(true, Ordering::SeqCst);
        }
    });

    let rows = processor.run(&records, &output).await?;

    println!("\nTranslation completed!");
    println!("   Rows: {}", rows.len());
    println!("   Results saved to: {}", output.display());

    Ok(())
}

/// Handle results filtering command
pub fn handle_filter(input: PathBuf, output: PathBuf) -> Result<()> {
    use crate::processors::filter::filter_failed;

    let report = filter_failed(&input, &output)?;

    println!("Rows scanned: {}", report.total_rows);
    println!("Rows dropped: {}", report.dropped_rows);
    for (column, count) in &report.failed_counts {
        if *count > 0 {
            println!("   {}: {} failed cells", column, count);
        }
    }
    println!("Output written to {}", output.display());

    Ok(())
}

/// Handle corpus sampling command
pub fn handle_sample(data_dir: PathBuf, output: PathBuf) -> Result<()> {
    use crate::processors::sampler::sample_dataset;

    let report = sample_dataset(&data_dir, &output)?;

    println!("Successfully created sample with {} data points", report.total);
    println!("Saved to: {}", output.display());
    println!("\nCategory distribution:");
    for (category, count) in &report.per_category {
        println!("Category {}: {} samples", category, count);
    }

    Ok(())
}

/// Ask for confirmation before making paid API calls
fn confirm_start() -> Result<bool> {
    use std::io::Write;

    print!("\nReady to start translation? This will make API calls. (yes/no): ");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("yes"))
}
