//! Output format drivers.
//!
//! The orchestrator drives every dump through the [`OutputFormatDriver`]
//! lifecycle; dialect-specific emission lives entirely in the driver.
//! Two drivers ship with the crate: SQL to a writer
//! ([`MysqlOutputFormatDriver`]) and one CSV file per table
//! ([`CsvOutputFormatDriver`]).

mod csv;
mod mysql;

pub use self::csv::CsvOutputFormatDriver;
pub use self::mysql::{MysqlOutputFormatDriver, DEFAULT_MAX_BUFFER_SIZE};

use async_trait::async_trait;

use crate::catalog::{TableMeta, TextRow};
use crate::config::TablePolicy;
use crate::error::Result;

/// Lifecycle hooks for rendering a dump in one output dialect.
///
/// All hooks are side-effecting; drivers own their sinks and any per-table
/// emission state (statement buffers, open files), which is reset at the
/// table boundaries marked by `begin_table_data_dump`/`end_table_data_dump`.
#[async_trait]
pub trait OutputFormatDriver: Send {
    /// Called once at the beginning of the entire run.
    async fn begin_dump(&mut self) -> Result<()>;

    /// Called once at the very end of the entire run.
    async fn end_dump(&mut self) -> Result<()>;

    /// Dump the structural information for a single table.
    async fn dump_table_structure(
        &mut self,
        table: &TableMeta,
        policy: &TablePolicy,
    ) -> Result<()>;

    /// Dump a view definition.
    async fn dump_view_definition(&mut self, view: &str, policy: &TablePolicy) -> Result<()>;

    /// Dump the trigger definitions attached to a table.
    async fn dump_trigger_definition(
        &mut self,
        table: &TableMeta,
        policy: &TablePolicy,
    ) -> Result<()>;

    /// Called before the first data row of a table.
    async fn begin_table_data_dump(
        &mut self,
        table: &TableMeta,
        policy: &TablePolicy,
    ) -> Result<()>;

    /// Called for every data row.
    async fn dump_table_row(
        &mut self,
        row: &TextRow,
        table: &TableMeta,
        policy: &TablePolicy,
    ) -> Result<()>;

    /// Called after the last data row of a table.
    async fn end_table_data_dump(
        &mut self,
        table: &TableMeta,
        policy: &TablePolicy,
    ) -> Result<()>;
}
