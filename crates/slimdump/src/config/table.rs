//! Table policies.
//!
//! A `TablePolicy` is the configured treatment of one table selector. It is
//! not a representation of a database table; column metadata comes from the
//! catalog at dump time.

use crate::error::{DumpError, Result};
use crate::selector::SelectorMap;

use super::column::ColumnPolicy;
use super::level::DumpLevel;

/// Whether and how triggers are exported for a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerDumpMode {
    /// Do not export triggers.
    None,
    /// Export triggers with the `DEFINER` clause stripped.
    NoDefiner,
    /// Export trigger definitions verbatim.
    KeepDefiner,
}

impl TriggerDumpMode {
    /// Parse the `dump-triggers` token. The legacy boolean spellings map to
    /// `true` → strip definers, `false` → skip triggers.
    pub fn parse(token: Option<&str>) -> Result<Self> {
        match token {
            None => Ok(TriggerDumpMode::NoDefiner),
            Some("true") => Ok(TriggerDumpMode::NoDefiner),
            Some("false") | Some("none") => Ok(TriggerDumpMode::None),
            Some("no-definer") => Ok(TriggerDumpMode::NoDefiner),
            Some("keep-definer") => Ok(TriggerDumpMode::KeepDefiner),
            Some(other) => Err(DumpError::config(format!(
                "Unsupported value '{}' for the 'dump-triggers' setting",
                other
            ))),
        }
    }
}

/// How view definitions handle their `DEFINER` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewDefinerMode {
    /// Strip the `DEFINER` clause.
    NoDefiner,
    /// Keep the definition verbatim.
    KeepDefiner,
}

impl ViewDefinerMode {
    /// Parse the `view-definer` token.
    pub fn parse(token: Option<&str>) -> Result<Self> {
        match token {
            None | Some("no-definer") => Ok(ViewDefinerMode::NoDefiner),
            Some("keep-definer") => Ok(ViewDefinerMode::KeepDefiner),
            Some(other) => Err(DumpError::config(format!(
                "Unsupported value '{}' for the 'view-definer' setting",
                other
            ))),
        }
    }
}

/// The configured treatment of one table selector.
#[derive(Debug)]
pub struct TablePolicy {
    selector: String,
    level: DumpLevel,
    columns: SelectorMap<ColumnPolicy>,
    condition: Option<String>,
    keep_auto_increment: bool,
    trigger_mode: TriggerDumpMode,
    view_definer: ViewDefinerMode,
}

impl TablePolicy {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        selector: String,
        level: DumpLevel,
        columns: SelectorMap<ColumnPolicy>,
        condition: Option<String>,
        keep_auto_increment: bool,
        trigger_mode: TriggerDumpMode,
        view_definer: ViewDefinerMode,
    ) -> Self {
        let condition = condition.and_then(|c| {
            let trimmed = c.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        });

        Self {
            selector,
            level,
            columns,
            condition,
            keep_auto_increment,
            trigger_mode,
            view_definer,
        }
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn level(&self) -> DumpLevel {
        self.level
    }

    /// Structure output is required at `schema` and above.
    pub fn requires_schema_dump(&self) -> bool {
        self.level.requires_schema()
    }

    /// Data output is required at `noblob` and above.
    pub fn requires_data_dump(&self) -> bool {
        self.level.requires_data()
    }

    /// Trigger output is required unless the mode is `none`.
    pub fn requires_trigger_dump(&self) -> bool {
        self.trigger_mode != TriggerDumpMode::None
    }

    pub fn trigger_mode(&self) -> TriggerDumpMode {
        self.trigger_mode
    }

    pub fn view_definer(&self) -> ViewDefinerMode {
        self.view_definer
    }

    pub fn keep_auto_increment(&self) -> bool {
        self.keep_auto_increment
    }

    /// The configured row filter, if any.
    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }

    /// ` WHERE <condition>` when a row filter is configured, empty otherwise.
    pub fn where_sql(&self) -> String {
        match &self.condition {
            Some(condition) => format!(" WHERE {}", condition),
            None => String::new(),
        }
    }

    /// Resolve the column policy matching a concrete column name.
    pub fn find_column(&self, column_name: &str) -> Option<&ColumnPolicy> {
        self.columns.resolve(column_name)
    }

    /// Iterate over all configured column policies.
    pub fn columns(&self) -> impl Iterator<Item = &ColumnPolicy> {
        self.columns.values()
    }

    /// The SELECT expression transporting one column.
    ///
    /// BLOB columns are nulled out when the effective level is `noblob`, and
    /// otherwise hex-encoded so they survive text-mode streaming; everything
    /// else is selected as the bare column.
    pub fn select_expression(&self, column_name: &str, is_blob: bool) -> String {
        let mut level = self.level;
        if let Some(column) = self.find_column(column_name) {
            level = column.level();
        }

        if is_blob {
            if level == DumpLevel::NoBlob {
                return "NULL".to_string();
            }

            return format!(
                "IF(ISNULL(`{c}`), NULL, IF(`{c}`='', '', CONCAT('0x', HEX(`{c}`))))",
                c = column_name
            );
        }

        format!("`{}`", column_name)
    }
}
