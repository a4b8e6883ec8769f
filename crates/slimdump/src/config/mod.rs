//! Dump configuration: selectors, table and column policies, replacements.

mod builder;
mod column;
mod level;
mod replacement;
mod table;

pub use builder::ConfigBuilder;
pub use column::ColumnPolicy;
pub use level::DumpLevel;
pub use replacement::{MatchStrategy, Replacement, ReplacementValue};
pub use table::{TablePolicy, TriggerDumpMode, ViewDefinerMode};

use crate::error::Result;
use crate::generator::ValueGenerator;
use crate::selector::SelectorMap;

/// The merged dump configuration: an ordered mapping from table selector to
/// policy. Built once at startup, read-only afterwards.
#[derive(Debug, Default)]
pub struct Config {
    tables: SelectorMap<TablePolicy>,
}

impl Config {
    pub(crate) fn from_tables(tables: SelectorMap<TablePolicy>) -> Self {
        Self { tables }
    }

    /// Resolve the policy for a concrete table or view name.
    pub fn find_table(&self, table_name: &str) -> Option<&TablePolicy> {
        self.tables.resolve(table_name)
    }

    /// Merge another configuration into this one. An entry for an identical
    /// selector string is fully replaced by the other configuration's entry.
    pub fn merge(&mut self, other: Config) {
        self.tables.merge(other.tables);
    }

    /// Number of configured table selectors.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether no table selectors are configured.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Eagerly validate every generator reference in the configuration
    /// against the injected capability, before any database access.
    pub fn validate_generator_references(&self, generator: &dyn ValueGenerator) -> Result<()> {
        for table in self.tables.values() {
            for column in table.columns() {
                for replacement in column.replacements() {
                    if let Some(reference) = replacement.generator_ref() {
                        generator.validate(reference)?;
                    }
                }
            }
        }
        Ok(())
    }
}
