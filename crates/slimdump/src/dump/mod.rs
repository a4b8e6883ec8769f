//! Dump orchestration.
//!
//! [`Dumper`] walks the catalog in listing order and drives an output
//! driver through the per-table lifecycle: structure, then data, then
//! triggers, each step gated by the resolved policy; views get their
//! definitions dumped in a final pass. Tables are processed strictly
//! sequentially.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::catalog::{Catalog, RowScan, TableMeta};
use crate::config::{Config, TablePolicy};
use crate::error::Result;
use crate::output::OutputFormatDriver;

/// Row interval for progress events during a table scan.
const PROGRESS_INTERVAL: u64 = 50_000;

/// Counters from a completed run.
#[derive(Debug, Clone, Default)]
pub struct DumpSummary {
    /// Tables whose structure was dumped.
    pub tables_dumped: usize,

    /// Views whose definition was dumped.
    pub views_dumped: usize,

    /// Total data rows written.
    pub rows_dumped: u64,
}

/// The dump orchestrator.
pub struct Dumper {
    config: Config,
    catalog: Arc<dyn Catalog>,
    driver: Box<dyn OutputFormatDriver>,
    report_progress: bool,
}

impl Dumper {
    pub fn new(
        config: Config,
        catalog: Arc<dyn Catalog>,
        driver: Box<dyn OutputFormatDriver>,
    ) -> Self {
        Self {
            config,
            catalog,
            driver,
            report_progress: true,
        }
    }

    /// Suppress per-table progress events.
    pub fn with_progress(mut self, report_progress: bool) -> Self {
        self.report_progress = report_progress;
        self
    }

    /// Run the dump. Catalog and query errors are fatal and abort the run;
    /// row-count drift during a scan is reported and skipped over.
    pub async fn run(mut self) -> Result<DumpSummary> {
        let mut summary = DumpSummary::default();

        self.driver.begin_dump().await?;

        for table_name in self.catalog.list_tables().await? {
            let policy = match self.config.find_table(&table_name) {
                Some(policy) => policy,
                None => {
                    debug!("{}: no matching selector, skipping", table_name);
                    continue;
                }
            };

            if !policy.requires_schema_dump() {
                debug!("{}: level {} skips structure", table_name, policy.level().as_str());
                continue;
            }

            let columns = self.catalog.columns(&table_name).await?;
            let table = TableMeta::new(table_name, columns);

            if self.report_progress {
                info!("{}: dumping structure", table.name);
            }
            self.driver.dump_table_structure(&table, policy).await?;

            if policy.requires_data_dump() {
                let rows = Self::dump_table_data(
                    &self.catalog,
                    &mut self.driver,
                    &table,
                    policy,
                    self.report_progress,
                )
                .await?;
                summary.rows_dumped += rows;
            }

            if policy.requires_trigger_dump() {
                self.driver.dump_trigger_definition(&table, policy).await?;
            }

            summary.tables_dumped += 1;
        }

        for view_name in self.catalog.list_views().await? {
            let policy = match self.config.find_table(&view_name) {
                Some(policy) => policy,
                None => continue,
            };

            if !policy.requires_schema_dump() {
                continue;
            }

            if self.report_progress {
                info!("{}: dumping view definition", view_name);
            }
            self.driver.dump_view_definition(&view_name, policy).await?;
            summary.views_dumped += 1;
        }

        self.driver.end_dump().await?;

        info!(
            "Dump complete: {} tables, {} views, {} rows",
            summary.tables_dumped, summary.views_dumped, summary.rows_dumped
        );

        Ok(summary)
    }

    /// The data step for one table: build the projection, count, and when
    /// rows exist, stream them through the driver.
    async fn dump_table_data(
        catalog: &Arc<dyn Catalog>,
        driver: &mut Box<dyn OutputFormatDriver>,
        table: &TableMeta,
        policy: &TablePolicy,
        report_progress: bool,
    ) -> Result<u64> {
        let select_list = table
            .columns
            .iter()
            .map(|c| {
                format!(
                    "{} AS {}",
                    policy.select_expression(&c.name, c.is_blob()),
                    catalog.quote_ident(&c.name)
                )
            })
            .collect::<Vec<_>>()
            .join(", ");

        let sql = format!(
            "SELECT {} FROM {}{}",
            select_list,
            catalog.quote_ident(&table.name),
            policy.where_sql()
        );

        let expected = catalog.count_rows(&table.name, &policy.where_sql()).await?;
        if expected == 0 {
            // Fail fast: nothing to dump, emit no data section at all.
            debug!("{}: no matching rows", table.name);
            return Ok(0);
        }

        driver.begin_table_data_dump(table, policy).await?;

        // Stream the scan unbuffered so the full result set is never
        // materialized; buffered mode must come back no matter how the scan
        // ends, or later catalog queries would run on a streaming connection.
        catalog.set_buffered_fetch(false).await?;
        let scan = Self::scan_rows(catalog, driver, table, policy, sql, report_progress).await;
        if let Err(e) = catalog.set_buffered_fetch(true).await {
            warn!("{}: failed to restore buffered fetch mode: {}", table.name, e);
        }
        let processed = scan?;

        driver.end_table_data_dump(table, policy).await?;

        if processed != expected {
            warn!(
                "{}: processed {} rows but expected {}; the table may have been written to during the dump",
                table.name, processed, expected
            );
        }

        if report_progress {
            info!("{}: dumped {} rows", table.name, processed);
        }

        Ok(processed)
    }

    async fn scan_rows(
        catalog: &Arc<dyn Catalog>,
        driver: &mut Box<dyn OutputFormatDriver>,
        table: &TableMeta,
        policy: &TablePolicy,
        sql: String,
        report_progress: bool,
    ) -> Result<u64> {
        let mut rx = catalog.stream_rows(RowScan {
            sql,
            columns: table.columns.clone(),
        });

        let mut processed: u64 = 0;
        while let Some(item) = rx.recv().await {
            let row = item?;
            driver.dump_table_row(&row, table, policy).await?;
            processed += 1;

            if report_progress && processed % PROGRESS_INTERVAL == 0 {
                debug!("{}: {} rows so far", table.name, processed);
            }
        }

        Ok(processed)
    }
}
