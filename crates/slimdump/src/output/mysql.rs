//! SQL output driver.
//!
//! Emits `DROP TABLE`/`CREATE TABLE` structure, trigger and view
//! definitions, and multi-row `INSERT` statements bracketed by
//! `LOCK TABLES`/`DISABLE KEYS` directives. Statements are size-bounded:
//! a running byte estimate decides when to terminate the current `INSERT`
//! and start a new one, so a huge table never produces one unbounded line.

use std::io::Write;
use std::sync::Arc;
use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;

use crate::catalog::{Catalog, ColumnInfo, TableMeta, TextRow};
use crate::config::{TablePolicy, TriggerDumpMode, ViewDefinerMode};
use crate::error::Result;
use crate::generator::ValueGenerator;

use super::OutputFormatDriver;

/// Default maximum estimated size of one statement: 100 MiB.
pub const DEFAULT_MAX_BUFFER_SIZE: usize = 104_857_600;

fn auto_increment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r" AUTO_INCREMENT=\d*").expect("static pattern"))
}

fn definer_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"DEFINER=`[^`]*`@`[^`]*` ").expect("static pattern"))
}

/// SQL dump driver writing to any [`Write`] sink.
pub struct MysqlOutputFormatDriver<W> {
    writer: W,
    catalog: Arc<dyn Catalog>,
    generator: Arc<dyn ValueGenerator>,
    max_buffer_size: usize,
    current_buffer_size: usize,
    single_line_insert_statements: bool,
}

impl<W: Write + Send> MysqlOutputFormatDriver<W> {
    pub fn new(writer: W, catalog: Arc<dyn Catalog>, generator: Arc<dyn ValueGenerator>) -> Self {
        Self {
            writer,
            catalog,
            generator,
            max_buffer_size: DEFAULT_MAX_BUFFER_SIZE,
            current_buffer_size: 0,
            single_line_insert_statements: false,
        }
    }

    /// Override the maximum estimated statement size.
    pub fn with_max_buffer_size(mut self, max_buffer_size: usize) -> Self {
        self.max_buffer_size = max_buffer_size;
        self
    }

    /// Emit each statement on a single line instead of one row per line.
    pub fn with_single_line_insert_statements(mut self, single_line: bool) -> Self {
        self.single_line_insert_statements = single_line;
        self
    }

    /// Consume the driver and return its sink.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_str(&mut self, s: &str) -> Result<()> {
        self.writer.write_all(s.as_bytes())?;
        Ok(())
    }

    fn write_line(&mut self, s: &str) -> Result<()> {
        self.writer.write_all(s.as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn insert_values_statement(&self, table: &TableMeta) -> String {
        let columns = table
            .columns
            .iter()
            .map(|c| self.catalog.quote_ident(&c.name))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ",
            self.catalog.quote_ident(&table.name),
            columns
        )
    }

    /// Terminate the open statement when appending `row_length` more bytes
    /// would exceed the maximum. Evaluated before the row is appended, so a
    /// statement never grows past the limit once non-empty.
    fn end_statement_if_buffer_exceeded(&mut self, row_length: usize) -> Result<()> {
        if self.current_buffer_size > 0
            && self.current_buffer_size + row_length > self.max_buffer_size
        {
            self.write_line(";")?;
            self.current_buffer_size = 0;
        }
        Ok(())
    }

    fn write_insert_statement_begin(&mut self, table: &TableMeta) -> Result<()> {
        if self.current_buffer_size == 0 {
            let header = self.insert_values_statement(table);
            self.write_str(&header)?;
        } else {
            self.write_str(",")?;
        }

        if !self.single_line_insert_statements {
            self.write_str("\n")?;
        }

        self.write_str("(")
    }

    /// Render one value for an INSERT statement.
    ///
    /// NULL and the empty string are rendered before any column policy runs;
    /// BLOB values without a policy are already hex literal expressions and
    /// must not be re-quoted.
    fn render_value(
        &self,
        value: &Option<String>,
        column: &ColumnInfo,
        policy: &TablePolicy,
    ) -> Result<String> {
        let value = match value {
            None => return Ok("NULL".to_string()),
            Some(v) => v,
        };

        if value.is_empty() {
            return Ok("\"\"".to_string());
        }

        if let Some(column_policy) = policy.find_column(&column.name) {
            let processed = column_policy.process_value(value, self.generator.as_ref())?;
            return Ok(self.catalog.quote_literal(&processed));
        }

        if column.is_blob() {
            return Ok(value.clone());
        }

        Ok(self.catalog.quote_literal(value))
    }

    fn row_length_estimate(row: &TextRow) -> usize {
        row.iter()
            .map(|value| value.as_ref().map(String::len).unwrap_or(0))
            .sum()
    }
}

#[async_trait]
impl<W: Write + Send> OutputFormatDriver for MysqlOutputFormatDriver<W> {
    async fn begin_dump(&mut self) -> Result<()> {
        let charset = self.catalog.connection_charset().await?;
        self.write_line(&format!("SET NAMES {};", charset))?;
        self.write_line("SET FOREIGN_KEY_CHECKS = 0;\n")
    }

    async fn end_dump(&mut self) -> Result<()> {
        self.write_line("\nSET FOREIGN_KEY_CHECKS = 1;")
    }

    async fn dump_table_structure(
        &mut self,
        table: &TableMeta,
        policy: &TablePolicy,
    ) -> Result<()> {
        self.write_line(&format!("-- BEGIN STRUCTURE {}", table.name))?;
        let quoted = self.catalog.quote_ident(&table.name);
        self.write_line(&format!("DROP TABLE IF EXISTS {};", quoted))?;

        let mut ddl = self.catalog.create_table_ddl(&table.name).await?;
        if !policy.keep_auto_increment() {
            ddl = auto_increment_re().replace_all(&ddl, "").into_owned();
        }

        self.write_line(&format!("{};\n", ddl))
    }

    async fn dump_trigger_definition(
        &mut self,
        table: &TableMeta,
        policy: &TablePolicy,
    ) -> Result<()> {
        let triggers = self.catalog.trigger_names(&table.name).await?;
        if triggers.is_empty() {
            return Ok(());
        }

        self.write_line(&format!("-- BEGIN TRIGGERS {}", table.name))?;
        self.write_line("DELIMITER ;;\n")?;

        for trigger in triggers {
            let mut ddl = self.catalog.create_trigger_ddl(&trigger).await?;
            if policy.trigger_mode() == TriggerDumpMode::NoDefiner {
                ddl = definer_re().replace_all(&ddl, "").into_owned();
            }
            self.write_line(&format!("{};;\n", ddl))?;
        }

        self.write_line("DELIMITER ;")
    }

    async fn dump_view_definition(&mut self, view: &str, policy: &TablePolicy) -> Result<()> {
        self.write_line(&format!("-- BEGIN VIEW {}", view))?;

        let mut ddl = self.catalog.create_view_ddl(view).await?;
        if policy.view_definer() == ViewDefinerMode::NoDefiner {
            ddl = definer_re().replace_all(&ddl, "").into_owned();
        }

        self.write_line(&format!("{};\n", ddl))
    }

    async fn begin_table_data_dump(
        &mut self,
        table: &TableMeta,
        _policy: &TablePolicy,
    ) -> Result<()> {
        self.current_buffer_size = 0;
        let quoted = self.catalog.quote_ident(&table.name);
        self.write_line(&format!("-- BEGIN DATA {}", table.name))?;
        self.write_line(&format!("LOCK TABLES {} WRITE;", quoted))?;
        self.write_line(&format!("ALTER TABLE {} DISABLE KEYS;", quoted))
    }

    async fn dump_table_row(
        &mut self,
        row: &TextRow,
        table: &TableMeta,
        policy: &TablePolicy,
    ) -> Result<()> {
        let row_length = Self::row_length_estimate(row);

        self.end_statement_if_buffer_exceeded(row_length)?;
        self.write_insert_statement_begin(table)?;

        for (idx, (value, column)) in row.iter().zip(table.columns.iter()).enumerate() {
            if idx > 0 {
                self.write_str(", ")?;
            }
            let rendered = self.render_value(value, column, policy)?;
            self.write_str(&rendered)?;
        }

        self.write_str(")")?;
        self.current_buffer_size += row_length;
        Ok(())
    }

    async fn end_table_data_dump(
        &mut self,
        table: &TableMeta,
        _policy: &TablePolicy,
    ) -> Result<()> {
        if self.current_buffer_size > 0 {
            self.write_line(";")?;
            self.current_buffer_size = 0;
        }

        let quoted = self.catalog.quote_ident(&table.name);
        self.write_line(&format!("ALTER TABLE {} ENABLE KEYS;", quoted))?;
        self.write_line("UNLOCK TABLES;")?;
        self.write_line("")
    }
}
