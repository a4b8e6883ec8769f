//! CSV output driver.
//!
//! Writes one `<table>.csv` file per table into a target directory: a
//! header record of column names, then one record per row with the same
//! value transformations the SQL driver applies. Structure, trigger and
//! view hooks are no-ops; CSV output carries data only.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::catalog::{TableMeta, TextRow};
use crate::config::TablePolicy;
use crate::error::{DumpError, Result};
use crate::generator::ValueGenerator;

use super::OutputFormatDriver;

/// CSV dump driver writing one file per table.
pub struct CsvOutputFormatDriver {
    directory: PathBuf,
    generator: Arc<dyn ValueGenerator>,
    writer: Option<csv::Writer<File>>,
}

impl std::fmt::Debug for CsvOutputFormatDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvOutputFormatDriver")
            .field("directory", &self.directory)
            .field("writer_open", &self.writer.is_some())
            .finish_non_exhaustive()
    }
}

impl CsvOutputFormatDriver {
    /// Create a driver targeting an existing directory.
    pub fn new(directory: impl Into<PathBuf>, generator: Arc<dyn ValueGenerator>) -> Result<Self> {
        let directory = directory.into();
        if !directory.is_dir() {
            return Err(DumpError::config(format!(
                "The directory '{}' does not exist or is not a directory",
                directory.display()
            )));
        }

        Ok(Self {
            directory,
            generator,
            writer: None,
        })
    }

    fn transform_row(&self, row: &TextRow, table: &TableMeta, policy: &TablePolicy) -> Result<Vec<String>> {
        let mut record = Vec::with_capacity(row.len());
        for (value, column) in row.iter().zip(table.columns.iter()) {
            let field = match value {
                None => String::new(),
                Some(raw) => match policy.find_column(&column.name) {
                    Some(column_policy) => {
                        column_policy.process_value(raw, self.generator.as_ref())?
                    }
                    None => raw.clone(),
                },
            };
            record.push(field);
        }
        Ok(record)
    }
}

#[async_trait]
impl OutputFormatDriver for CsvOutputFormatDriver {
    async fn begin_dump(&mut self) -> Result<()> {
        Ok(())
    }

    async fn end_dump(&mut self) -> Result<()> {
        Ok(())
    }

    async fn dump_table_structure(
        &mut self,
        _table: &TableMeta,
        _policy: &TablePolicy,
    ) -> Result<()> {
        Ok(())
    }

    async fn dump_view_definition(&mut self, _view: &str, _policy: &TablePolicy) -> Result<()> {
        Ok(())
    }

    async fn dump_trigger_definition(
        &mut self,
        _table: &TableMeta,
        _policy: &TablePolicy,
    ) -> Result<()> {
        Ok(())
    }

    async fn begin_table_data_dump(
        &mut self,
        table: &TableMeta,
        _policy: &TablePolicy,
    ) -> Result<()> {
        let path = self.directory.join(format!("{}.csv", table.name));
        let mut writer = csv::Writer::from_path(&path)?;

        writer.write_record(table.columns.iter().map(|c| c.name.as_str()))?;
        self.writer = Some(writer);
        Ok(())
    }

    async fn dump_table_row(
        &mut self,
        row: &TextRow,
        table: &TableMeta,
        policy: &TablePolicy,
    ) -> Result<()> {
        let record = self.transform_row(row, table, policy)?;
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| DumpError::config("CSV row emitted outside a table data dump"))?;
        writer.write_record(&record)?;
        Ok(())
    }

    async fn end_table_data_dump(
        &mut self,
        _table: &TableMeta,
        _policy: &TablePolicy,
    ) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ColumnInfo;
    use crate::config::ConfigBuilder;
    use crate::generator::BuiltinGenerator;

    fn generator() -> Arc<dyn ValueGenerator> {
        Arc::new(BuiltinGenerator::new())
    }

    #[tokio::test]
    async fn writes_header_and_transformed_records() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigBuilder::from_str(
            r#"
tables:
  - name: "users"
    dump: full
    columns:
      - name: "email"
        dump: masked
"#,
        )
        .unwrap();
        let policy = config.find_table("users").unwrap();
        let table = TableMeta::new(
            "users",
            vec![
                ColumnInfo::new("id", "int(11)"),
                ColumnInfo::new("email", "varchar(64)"),
            ],
        );

        let mut driver = CsvOutputFormatDriver::new(dir.path(), generator()).unwrap();
        driver.begin_table_data_dump(&table, policy).await.unwrap();
        driver
            .dump_table_row(
                &vec![Some("1".into()), Some("a@b.com".into())],
                &table,
                policy,
            )
            .await
            .unwrap();
        driver
            .dump_table_row(&vec![Some("2".into()), None], &table, policy)
            .await
            .unwrap();
        driver.end_table_data_dump(&table, policy).await.unwrap();

        let written = std::fs::read_to_string(dir.path().join("users.csv")).unwrap();
        let mut lines = written.lines();
        assert_eq!(lines.next(), Some("id,email"));
        assert_eq!(lines.next(), Some("1,x@x.xxx"));
        assert_eq!(lines.next(), Some("2,"));
    }

    #[tokio::test]
    async fn fields_with_separators_are_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigBuilder::from_str(
            r#"
tables:
  - name: "notes"
    dump: full
"#,
        )
        .unwrap();
        let policy = config.find_table("notes").unwrap();
        let table = TableMeta::new("notes", vec![ColumnInfo::new("body", "text")]);

        let mut driver = CsvOutputFormatDriver::new(dir.path(), generator()).unwrap();
        driver.begin_table_data_dump(&table, policy).await.unwrap();
        driver
            .dump_table_row(&vec![Some("a,b \"c\"".into())], &table, policy)
            .await
            .unwrap();
        driver.end_table_data_dump(&table, policy).await.unwrap();

        let written = std::fs::read_to_string(dir.path().join("notes.csv")).unwrap();
        assert!(written.contains("\"a,b \"\"c\"\"\""));
    }

    #[tokio::test]
    async fn structure_hooks_emit_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigBuilder::from_str(
            r#"
tables:
  - name: "users"
    dump: full
"#,
        )
        .unwrap();
        let policy = config.find_table("users").unwrap();
        let table = TableMeta::new("users", vec![ColumnInfo::new("id", "int(11)")]);

        let mut driver = CsvOutputFormatDriver::new(dir.path(), generator()).unwrap();
        driver.begin_dump().await.unwrap();
        driver.dump_table_structure(&table, policy).await.unwrap();
        driver.dump_trigger_definition(&table, policy).await.unwrap();
        driver.dump_view_definition("v", policy).await.unwrap();
        driver.end_dump().await.unwrap();

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn missing_directory_is_a_config_error() {
        let err = CsvOutputFormatDriver::new("/nonexistent/dir", generator()).unwrap_err();
        assert!(matches!(err, DumpError::Config(_)));
    }
}
