//! Medical Safety Japanese Translation Tool
//!
//! This library batch-translates medical safety benchmark questions into
//! Japanese by fanning each dataset row out to several LLM backends behind
//! one chat-completion API, checkpointing progress so long runs survive
//! interruption.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

pub mod cli;
pub mod core;
pub mod processors;
pub mod storage;

// Re-export key types for convenience
pub use crate::core::{
    client::Translator,
    config::TranslatorConfig,
    errors::TranslationError,
    models::{InputRecord, Model, ResultRow, TranslationOutcome, FAILURE_SENTINEL},
};

pub use crate::processors::{
    dataset::DatasetProcessor,
    filter::{filter_failed, FilterReport},
    sampler::{sample_dataset, SampleReport},
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
