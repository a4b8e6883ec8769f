//! Database catalog access.
//!
//! The dump engine consumes the database exclusively through the
//! [`Catalog`] trait: listing tables and views, column metadata, `SHOW
//! CREATE` retrieval, row counting, and streaming row scans. The MySQL
//! implementation lives in [`MySqlCatalog`]; tests inject a stub.

mod mysql;

#[cfg(test)]
pub(crate) mod stub;

pub use mysql::MySqlCatalog;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::Result;

/// One column as reported by the catalog.
#[derive(Debug, Clone)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,
    /// Raw type string, e.g. `varchar(255)` or `longblob`.
    pub data_type: String,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }

    /// BLOB classification: any `blob` or `binary` flavored type.
    pub fn is_blob(&self) -> bool {
        let lower = self.data_type.to_ascii_lowercase();
        lower.contains("blob") || lower.contains("binary")
    }
}

/// A table with its ordered column metadata, as handed to output drivers.
#[derive(Debug, Clone)]
pub struct TableMeta {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
}

impl TableMeta {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnInfo>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }
}

/// One fetched row: every value transported as text (BLOBs arrive
/// hex-encoded by their select expression), `None` for SQL NULL.
pub type TextRow = Vec<Option<String>>;

/// A row scan request: the full SELECT statement plus the column metadata
/// needed to decode the result set.
#[derive(Debug, Clone)]
pub struct RowScan {
    pub sql: String,
    pub columns: Vec<ColumnInfo>,
}

/// Read-only access to the database being dumped.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// List base tables in catalog order.
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// List views in catalog order.
    async fn list_views(&self) -> Result<Vec<String>>;

    /// Column metadata for a table, in definition order.
    async fn columns(&self, table: &str) -> Result<Vec<ColumnInfo>>;

    /// The verbatim `CREATE TABLE` statement.
    async fn create_table_ddl(&self, table: &str) -> Result<String>;

    /// Names of triggers attached to a table.
    async fn trigger_names(&self, table: &str) -> Result<Vec<String>>;

    /// The verbatim `CREATE TRIGGER` statement.
    async fn create_trigger_ddl(&self, trigger: &str) -> Result<String>;

    /// The verbatim `CREATE VIEW` statement.
    async fn create_view_ddl(&self, view: &str) -> Result<String>;

    /// The connection character set, for the dump preamble.
    async fn connection_charset(&self) -> Result<String>;

    /// Row count for a table, honoring the policy's row filter.
    /// `where_sql` is either empty or a leading-space ` WHERE ...` fragment.
    async fn count_rows(&self, table: &str, where_sql: &str) -> Result<u64>;

    /// Start a row scan. The receiver yields rows until the scan is
    /// exhausted; a query error is delivered in-band and ends the stream.
    fn stream_rows(&self, scan: RowScan) -> mpsc::Receiver<Result<TextRow>>;

    /// Toggle between buffered and streaming result fetching. The engine
    /// switches to streaming for the duration of each table scan and
    /// restores buffered mode afterwards.
    async fn set_buffered_fetch(&self, buffered: bool) -> Result<()>;

    /// Quote an identifier (MySQL-style backticks).
    fn quote_ident(&self, name: &str) -> String {
        format!("`{}`", name.replace('`', "``"))
    }

    /// Quote a string literal (MySQL-style escaping).
    fn quote_literal(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len() + 2);
        out.push('\'');
        for c in value.chars() {
            match c {
                '\'' => out.push_str("\\'"),
                '\\' => out.push_str("\\\\"),
                '"' => out.push_str("\\\""),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\0' => out.push_str("\\0"),
                '\u{1a}' => out.push_str("\\Z"),
                other => out.push(other),
            }
        }
        out.push('\'');
        out
    }
}
