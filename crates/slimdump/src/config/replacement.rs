//! Replacement rules for `replace`-level columns.

use regex::Regex;

use crate::error::{DumpError, Result};
use crate::generator::{GeneratorRef, ValueGenerator};

/// How a replacement rule decides whether it applies to a raw value.
#[derive(Debug, Clone)]
pub enum MatchStrategy {
    /// Always matches.
    Passthrough,
    /// Matches when the raw value equals the constraint.
    Eq(String),
    /// Matches when the raw value differs from the constraint.
    Neq(String),
    /// Matches when the raw value fully matches the constraint pattern.
    Regex(Regex),
}

/// The value a matching rule produces.
#[derive(Debug, Clone)]
pub enum ReplacementValue {
    /// A literal string, used as-is.
    Literal(String),
    /// A generator reference, resolved through the injected capability.
    Generator(GeneratorRef),
}

/// One rule in a column's ordered replacement list.
#[derive(Debug, Clone)]
pub struct Replacement {
    strategy: MatchStrategy,
    value: ReplacementValue,
}

impl Replacement {
    /// Build a rule from configuration tokens.
    ///
    /// A missing or `passthrough` strategy always matches; `regex` requires
    /// its constraint. The selector is only used for error messages.
    pub fn new(
        strategy: Option<&str>,
        constraint: Option<String>,
        value: String,
        selector: &str,
    ) -> Result<Self> {
        let strategy = match strategy {
            None | Some("passthrough") => MatchStrategy::Passthrough,
            Some("eq") => MatchStrategy::Eq(constraint.unwrap_or_default()),
            Some("neq") => MatchStrategy::Neq(constraint.unwrap_or_default()),
            Some("regex") => {
                let constraint = match constraint {
                    Some(c) if !c.is_empty() => c,
                    _ => {
                        return Err(DumpError::MissingRegexConstraint {
                            selector: selector.to_string(),
                        })
                    }
                };
                let anchored = format!("^(?:{})$", constraint);
                let regex =
                    Regex::new(&anchored).map_err(|source| DumpError::InvalidPattern {
                        pattern: constraint,
                        source,
                    })?;
                MatchStrategy::Regex(regex)
            }
            Some(other) => {
                return Err(DumpError::InvalidReplacementStrategy {
                    token: other.to_string(),
                })
            }
        };

        Ok(Self {
            strategy,
            value: parse_value(value)?,
        })
    }

    /// Build an unconditional rule, as produced by the inline `replacement`
    /// shorthand on a column entry.
    pub fn catch_all(value: String) -> Result<Self> {
        Ok(Self {
            strategy: MatchStrategy::Passthrough,
            value: parse_value(value)?,
        })
    }

    /// Whether this rule applies to a raw value.
    pub fn matches(&self, value: &str) -> bool {
        match &self.strategy {
            MatchStrategy::Passthrough => true,
            MatchStrategy::Eq(constraint) => constraint == value,
            MatchStrategy::Neq(constraint) => constraint != value,
            MatchStrategy::Regex(regex) => regex.is_match(value),
        }
    }

    /// Produce the replacement value, invoking the generator for
    /// generator references.
    pub fn resolve(&self, generator: &dyn ValueGenerator) -> Result<String> {
        match &self.value {
            ReplacementValue::Literal(literal) => Ok(literal.clone()),
            ReplacementValue::Generator(reference) => generator.generate(reference),
        }
    }

    /// The generator reference behind this rule, if any.
    pub fn generator_ref(&self) -> Option<&GeneratorRef> {
        match &self.value {
            ReplacementValue::Generator(reference) => Some(reference),
            ReplacementValue::Literal(_) => None,
        }
    }
}

fn parse_value(value: String) -> Result<ReplacementValue> {
    if GeneratorRef::is_reference(&value) {
        Ok(ReplacementValue::Generator(GeneratorRef::parse(&value)?))
    } else {
        Ok(ReplacementValue::Literal(value))
    }
}
