//! Configuration document parsing.
//!
//! Documents are parsed into a raw, stringly-typed serde layer first and
//! then converted into validated policies, so that every token problem
//! (dump levels, strategies, selectors, generator references) surfaces as a
//! typed configuration error instead of a serde message.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;
use crate::selector::SelectorMap;

use super::column::ColumnPolicy;
use super::level::DumpLevel;
use super::replacement::Replacement;
use super::table::{TablePolicy, TriggerDumpMode, ViewDefinerMode};
use super::Config;

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    tables: Vec<RawTable>,
}

#[derive(Debug, Deserialize)]
struct RawTable {
    name: String,
    dump: String,
    condition: Option<String>,
    #[serde(rename = "keep-auto-increment")]
    keep_auto_increment: Option<bool>,
    #[serde(rename = "dump-triggers")]
    dump_triggers: Option<Token>,
    #[serde(rename = "view-definer")]
    view_definer: Option<String>,
    #[serde(default)]
    columns: Vec<RawColumn>,
}

#[derive(Debug, Deserialize)]
struct RawColumn {
    name: String,
    dump: String,
    replacement: Option<String>,
    #[serde(default)]
    replacements: Vec<RawReplacement>,
}

#[derive(Debug, Deserialize)]
struct RawReplacement {
    strategy: Option<String>,
    constraint: Option<String>,
    #[serde(default)]
    value: String,
}

/// A token that YAML may have parsed as a bare boolean (the legacy
/// `dump-triggers: true` / `false` spellings).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Token {
    Bool(bool),
    String(String),
}

impl Token {
    fn as_str(&self) -> &str {
        match self {
            Token::Bool(true) => "true",
            Token::Bool(false) => "false",
            Token::String(s) => s.as_str(),
        }
    }
}

/// Builds [`Config`] values from YAML documents.
pub struct ConfigBuilder;

impl ConfigBuilder {
    /// Parse a single YAML document.
    pub fn from_str(document: &str) -> Result<Config> {
        let raw: RawDocument = serde_yaml::from_str(document)?;

        let mut tables = SelectorMap::new();
        for raw_table in raw.tables {
            let table = build_table(raw_table)?;
            tables.insert(table.selector().to_string(), table)?;
        }

        Ok(Config::from_tables(tables))
    }

    /// Parse several documents and merge them left-to-right: a later
    /// document's entry for an identical selector string fully replaces the
    /// earlier one.
    pub fn from_strs<S: AsRef<str>>(documents: &[S]) -> Result<Config> {
        let mut merged = Config::default();
        for document in documents {
            merged.merge(Self::from_str(document.as_ref())?);
        }
        Ok(merged)
    }

    /// Load and merge one or more configuration files.
    pub fn from_files<P: AsRef<Path>>(paths: &[P]) -> Result<Config> {
        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            documents.push(fs::read_to_string(path)?);
        }
        Self::from_strs(&documents)
    }
}

fn build_table(raw: RawTable) -> Result<TablePolicy> {
    let level = DumpLevel::parse(&raw.dump, &raw.name)?;
    let trigger_mode = TriggerDumpMode::parse(raw.dump_triggers.as_ref().map(Token::as_str))?;
    let view_definer = ViewDefinerMode::parse(raw.view_definer.as_deref())?;

    let mut columns = SelectorMap::new();
    for raw_column in raw.columns {
        let column = build_column(raw_column)?;
        columns.insert(column.selector().to_string(), column)?;
    }

    Ok(TablePolicy::new(
        raw.name,
        level,
        columns,
        raw.condition,
        raw.keep_auto_increment.unwrap_or(true),
        trigger_mode,
        view_definer,
    ))
}

fn build_column(raw: RawColumn) -> Result<ColumnPolicy> {
    let level = DumpLevel::parse(&raw.dump, &raw.name)?;

    let mut replacements = Vec::new();
    if level == DumpLevel::Replace {
        if let Some(inline) = raw.replacement {
            replacements.push(Replacement::catch_all(inline)?);
        } else {
            for raw_replacement in raw.replacements {
                replacements.push(Replacement::new(
                    raw_replacement.strategy.as_deref(),
                    raw_replacement.constraint,
                    raw_replacement.value,
                    &raw.name,
                )?);
            }
        }
    }

    Ok(ColumnPolicy::new(raw.name, level, replacements))
}
