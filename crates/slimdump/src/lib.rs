//! # slimdump
//!
//! Selective, privacy-safe MySQL dump library.
//!
//! This library provides the core functionality for exporting a MySQL
//! database's structure and contents as a reconstructable dump, with
//! support for:
//!
//! - **Selector-based policies**: wildcard patterns decide per table and
//!   per column what gets exported
//! - **Value transformation**: masking, blanking, and rule-based
//!   replacement (including generated fake data) before anything is written
//! - **Size-bounded streaming**: rows are streamed and emitted as
//!   multi-row `INSERT` statements split at a configurable byte budget
//! - **Pluggable output**: SQL to any writer, or one CSV file per table
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use slimdump::{BuiltinGenerator, ConfigBuilder, Dumper, MySqlCatalog, MysqlOutputFormatDriver};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), slimdump::DumpError> {
//!     let config = ConfigBuilder::from_files(&["slimdump.yaml"])?;
//!     let generator = Arc::new(BuiltinGenerator::new());
//!     config.validate_generator_references(generator.as_ref())?;
//!
//!     let catalog = Arc::new(MySqlCatalog::connect("mysql://user:pw@localhost/db").await?);
//!     let driver =
//!         MysqlOutputFormatDriver::new(std::io::stdout(), catalog.clone(), generator);
//!
//!     let summary = Dumper::new(config, catalog, Box::new(driver)).run().await?;
//!     eprintln!("dumped {} rows", summary.rows_dumped);
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod dump;
pub mod error;
pub mod generator;
pub mod output;
pub mod selector;

// Re-exports for convenient access
pub use catalog::{Catalog, ColumnInfo, MySqlCatalog, TableMeta, TextRow};
pub use config::{Config, ConfigBuilder, DumpLevel, TablePolicy};
pub use dump::{DumpSummary, Dumper};
pub use error::{DumpError, Result};
pub use generator::{BuiltinGenerator, GeneratorRef, ValueGenerator};
pub use output::{
    CsvOutputFormatDriver, MysqlOutputFormatDriver, OutputFormatDriver, DEFAULT_MAX_BUFFER_SIZE,
};
