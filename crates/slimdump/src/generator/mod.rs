//! Replacement value generation.
//!
//! Replacement values in the configuration may reference a generator instead
//! of carrying a literal: `FAKER_email`, `FAKER_unique->uuid`,
//! `FAKER_numerify:####`. The reference grammar is
//! `FAKER_[modifier->]method[:arg,arg,...]`.
//!
//! The generation capability itself is injected as a [`ValueGenerator`]
//! trait object, which keeps the transformation pipeline testable with a
//! stub and lets applications plug in richer data sources. A default
//! implementation is provided by [`BuiltinGenerator`].

mod builtin;

pub use builtin::BuiltinGenerator;

use crate::error::{DumpError, Result};

/// Prefix marking a replacement value as a generator reference.
pub const GENERATOR_PREFIX: &str = "FAKER_";

/// A parsed generator reference from a replacement value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorRef {
    /// The replacement value as written in the configuration.
    pub raw: String,

    /// Optional modifier, e.g. `unique` in `FAKER_unique->email`.
    pub modifier: Option<String>,

    /// Generator method name, e.g. `email`.
    pub method: String,

    /// Arguments following `:`, comma-separated and lowercased.
    pub args: Vec<String>,
}

impl GeneratorRef {
    /// Whether a replacement value is a generator reference.
    ///
    /// Static check so that literal replacements never pay for parsing.
    pub fn is_reference(value: &str) -> bool {
        value.starts_with(GENERATOR_PREFIX)
    }

    /// Parse a `FAKER_`-prefixed replacement value.
    pub fn parse(value: &str) -> Result<Self> {
        let body = value
            .strip_prefix(GENERATOR_PREFIX)
            .ok_or_else(|| DumpError::UnknownGenerator(value.to_string()))?;

        let (spec, args) = match body.split_once(':') {
            Some((spec, arg_list)) => {
                let args = arg_list
                    .to_ascii_lowercase()
                    .split(',')
                    .map(|a| a.trim().to_string())
                    .collect();
                (spec, args)
            }
            None => (body, Vec::new()),
        };

        let (modifier, method) = match spec.split_once("->") {
            Some((modifier, method)) => (Some(modifier.to_string()), method.to_string()),
            None => (None, spec.to_string()),
        };

        if method.is_empty() {
            return Err(DumpError::UnknownGenerator(value.to_string()));
        }

        Ok(Self {
            raw: value.to_string(),
            modifier,
            method,
            args,
        })
    }
}

/// Capability for synthesizing replacement values.
///
/// `validate` is called eagerly for every generator reference found in the
/// configuration, before any database access, so that a typo in a generator
/// name aborts the run instead of silently producing empty values.
pub trait ValueGenerator: Send + Sync {
    /// Check that a reference names a known method/modifier with acceptable
    /// arguments.
    fn validate(&self, reference: &GeneratorRef) -> Result<()>;

    /// Produce a value for a reference.
    fn generate(&self, reference: &GeneratorRef) -> Result<String>;
}
