//! In-memory catalog stub for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::{DumpError, Result};

use super::{Catalog, ColumnInfo, RowScan, TextRow};

/// A scripted catalog: tables, rows and DDL are provided up front, and the
/// stub records every fetch-mode toggle so tests can assert the restore
/// behavior.
#[derive(Default)]
pub(crate) struct StubCatalog {
    tables: Vec<String>,
    views: Vec<String>,
    columns: HashMap<String, Vec<ColumnInfo>>,
    rows: HashMap<String, Vec<TextRow>>,
    table_ddl: HashMap<String, String>,
    triggers: HashMap<String, Vec<(String, String)>>,
    view_ddl: HashMap<String, String>,
    count_override: HashMap<String, u64>,
    pub(crate) fetch_mode_log: Mutex<Vec<bool>>,
}

impl StubCatalog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_table(
        mut self,
        name: &str,
        columns: Vec<ColumnInfo>,
        rows: Vec<TextRow>,
    ) -> Self {
        self.tables.push(name.to_string());
        self.table_ddl.insert(
            name.to_string(),
            format!("CREATE TABLE `{}` (\n  `stub` int(11)\n) ENGINE=InnoDB", name),
        );
        self.columns.insert(name.to_string(), columns);
        self.rows.insert(name.to_string(), rows);
        self
    }

    pub(crate) fn with_table_ddl(mut self, name: &str, ddl: &str) -> Self {
        self.table_ddl.insert(name.to_string(), ddl.to_string());
        self
    }

    pub(crate) fn with_trigger(mut self, table: &str, trigger: &str, ddl: &str) -> Self {
        self.triggers
            .entry(table.to_string())
            .or_default()
            .push((trigger.to_string(), ddl.to_string()));
        self
    }

    pub(crate) fn with_view(mut self, name: &str, ddl: &str) -> Self {
        self.views.push(name.to_string());
        self.view_ddl.insert(name.to_string(), ddl.to_string());
        self
    }

    /// Make `count_rows` disagree with the actual row stream, simulating
    /// concurrent writes during the scan.
    pub(crate) fn with_count_override(mut self, table: &str, count: u64) -> Self {
        self.count_override.insert(table.to_string(), count);
        self
    }
}

#[async_trait]
impl Catalog for StubCatalog {
    async fn list_tables(&self) -> Result<Vec<String>> {
        Ok(self.tables.clone())
    }

    async fn list_views(&self) -> Result<Vec<String>> {
        Ok(self.views.clone())
    }

    async fn columns(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        self.columns
            .get(table)
            .cloned()
            .ok_or_else(|| DumpError::config(format!("stub: no columns for {table}")))
    }

    async fn create_table_ddl(&self, table: &str) -> Result<String> {
        self.table_ddl
            .get(table)
            .cloned()
            .ok_or_else(|| DumpError::config(format!("stub: no ddl for {table}")))
    }

    async fn trigger_names(&self, table: &str) -> Result<Vec<String>> {
        Ok(self
            .triggers
            .get(table)
            .map(|list| list.iter().map(|(name, _)| name.clone()).collect())
            .unwrap_or_default())
    }

    async fn create_trigger_ddl(&self, trigger: &str) -> Result<String> {
        self.triggers
            .values()
            .flatten()
            .find(|(name, _)| name == trigger)
            .map(|(_, ddl)| ddl.clone())
            .ok_or_else(|| DumpError::config(format!("stub: no trigger {trigger}")))
    }

    async fn create_view_ddl(&self, view: &str) -> Result<String> {
        self.view_ddl
            .get(view)
            .cloned()
            .ok_or_else(|| DumpError::config(format!("stub: no view {view}")))
    }

    async fn connection_charset(&self) -> Result<String> {
        Ok("utf8mb4".to_string())
    }

    async fn count_rows(&self, table: &str, _where_sql: &str) -> Result<u64> {
        if let Some(count) = self.count_override.get(table) {
            return Ok(*count);
        }
        Ok(self.rows.get(table).map(Vec::len).unwrap_or(0) as u64)
    }

    fn stream_rows(&self, scan: RowScan) -> mpsc::Receiver<Result<TextRow>> {
        // The scan SQL embeds the table as `FROM `name``; find it by probe.
        let rows = self
            .tables
            .iter()
            .find(|t| scan.sql.contains(&format!("FROM `{t}`")))
            .and_then(|t| self.rows.get(t))
            .cloned()
            .unwrap_or_default();

        let (tx, rx) = mpsc::channel(rows.len().max(1));
        for row in rows {
            let _ = tx.try_send(Ok(row));
        }
        rx
    }

    async fn set_buffered_fetch(&self, buffered: bool) -> Result<()> {
        self.fetch_mode_log
            .lock()
            .map_err(|_| DumpError::config("stub: fetch mode log poisoned"))?
            .push(buffered);
        Ok(())
    }
}
