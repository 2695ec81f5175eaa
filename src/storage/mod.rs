//! Durable storage for input datasets and translation snapshots

pub mod csv_store;
