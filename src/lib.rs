#![forbid(unsafe_code)]

pub mod assemble;
pub mod cli;
pub mod competitor;
pub mod config;
pub mod content;
pub mod error;
pub mod formats;
pub mod ingest;
pub mod logging;
pub mod pipeline;
pub mod store;
