//! Column policies and the value transformation they perform.

use crate::error::Result;
use crate::generator::ValueGenerator;

use super::level::DumpLevel;
use super::replacement::Replacement;

/// A configured column: selector, directive, and replacement rules for
/// `replace` columns.
#[derive(Debug)]
pub struct ColumnPolicy {
    selector: String,
    level: DumpLevel,
    replacements: Vec<Replacement>,
}

impl ColumnPolicy {
    pub fn new(selector: String, level: DumpLevel, replacements: Vec<Replacement>) -> Self {
        Self {
            selector,
            level,
            replacements,
        }
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn level(&self) -> DumpLevel {
        self.level
    }

    pub fn replacements(&self) -> &[Replacement] {
        &self.replacements
    }

    /// Transform a raw value according to this column's directive.
    ///
    /// - `masked`: ASCII letters and digits become `x`; separators survive,
    ///   so values keep their shape.
    /// - `blank`: the value becomes the empty string.
    /// - `replace`: the first matching rule in order wins. No rules, or no
    ///   rule matching, yields the empty string so a missed value can never
    ///   leak through.
    /// - any other level passes the value through unchanged.
    pub fn process_value(&self, value: &str, generator: &dyn ValueGenerator) -> Result<String> {
        match self.level {
            DumpLevel::Masked => Ok(mask(value)),
            DumpLevel::Blank => Ok(String::new()),
            DumpLevel::Replace => {
                for replacement in &self.replacements {
                    if replacement.matches(value) {
                        return replacement.resolve(generator);
                    }
                }
                Ok(String::new())
            }
            _ => Ok(value.to_string()),
        }
    }
}

fn mask(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { 'x' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::BuiltinGenerator;

    fn policy(level: DumpLevel, replacements: Vec<Replacement>) -> ColumnPolicy {
        ColumnPolicy::new("col".into(), level, replacements)
    }

    #[test]
    fn masking_preserves_shape() {
        let gen = BuiltinGenerator::new();
        let p = policy(DumpLevel::Masked, Vec::new());
        assert_eq!(
            p.process_value("test@fest.com", &gen).unwrap(),
            "xxxx@xxxx.xxx"
        );
        assert_eq!(p.process_value("123-45-6789", &gen).unwrap(), "xxx-xx-xxxx");
        assert_eq!(p.process_value("äöü", &gen).unwrap(), "äöü");
    }

    #[test]
    fn blank_always_empties() {
        let gen = BuiltinGenerator::new();
        let p = policy(DumpLevel::Blank, Vec::new());
        assert_eq!(p.process_value("anything", &gen).unwrap(), "");
        assert_eq!(p.process_value("", &gen).unwrap(), "");
    }

    #[test]
    fn replace_first_matching_rule_wins() {
        let gen = BuiltinGenerator::new();
        let rules = vec![
            Replacement::new(Some("regex"), Some("^A.*".into()), "X".into(), "c").unwrap(),
            Replacement::new(Some("eq"), Some("B".into()), "Y".into(), "c").unwrap(),
            Replacement::new(None, None, "Z".into(), "c").unwrap(),
        ];
        let p = policy(DumpLevel::Replace, rules);
        assert_eq!(p.process_value("Axxx", &gen).unwrap(), "X");
        assert_eq!(p.process_value("B", &gen).unwrap(), "Y");
        assert_eq!(p.process_value("C", &gen).unwrap(), "Z");
    }

    #[test]
    fn replace_without_matching_rule_yields_empty() {
        let gen = BuiltinGenerator::new();
        let rules =
            vec![Replacement::new(Some("eq"), Some("only".into()), "X".into(), "c").unwrap()];
        let p = policy(DumpLevel::Replace, rules);
        assert_eq!(p.process_value("other", &gen).unwrap(), "");
    }

    #[test]
    fn replace_without_rules_yields_empty() {
        let gen = BuiltinGenerator::new();
        let p = policy(DumpLevel::Replace, Vec::new());
        assert_eq!(p.process_value("secret", &gen).unwrap(), "");
    }

    #[test]
    fn other_levels_pass_through() {
        let gen = BuiltinGenerator::new();
        let p = policy(DumpLevel::Full, Vec::new());
        assert_eq!(p.process_value("kept", &gen).unwrap(), "kept");
    }
}
