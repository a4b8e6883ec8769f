//! Dump levels.

use crate::error::{DumpError, Result};

/// Policy controlling whether and how a table or column's content is
/// exported.
///
/// The first five levels form an ordered scale; `Blank` and `Replace` are
/// column-granularity directives whose rank sits above `Full` so that a
/// table carrying one still gets schema and data output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DumpLevel {
    /// Export nothing.
    None,
    /// Export structure only.
    Schema,
    /// Export structure and data, but null out BLOB content.
    NoBlob,
    /// Export structure and data; masking happens per column.
    Masked,
    /// Export everything verbatim.
    Full,
    /// Column directive: value becomes the empty string.
    Blank,
    /// Column directive: value is rewritten through replacement rules.
    Replace,
}

impl DumpLevel {
    fn rank(self) -> u8 {
        match self {
            DumpLevel::None => 1,
            DumpLevel::Schema => 2,
            DumpLevel::NoBlob => 3,
            DumpLevel::Masked => 4,
            DumpLevel::Full => 5,
            DumpLevel::Blank => 6,
            DumpLevel::Replace => 7,
        }
    }

    /// Parse a configuration token. Unknown tokens are a configuration
    /// error carrying the selector they appeared under.
    pub fn parse(token: &str, selector: &str) -> Result<Self> {
        match token.to_ascii_lowercase().as_str() {
            "none" => Ok(DumpLevel::None),
            "schema" => Ok(DumpLevel::Schema),
            "noblob" => Ok(DumpLevel::NoBlob),
            "masked" => Ok(DumpLevel::Masked),
            "full" => Ok(DumpLevel::Full),
            "blank" => Ok(DumpLevel::Blank),
            "replace" => Ok(DumpLevel::Replace),
            _ => Err(DumpError::InvalidDumpLevel {
                token: token.to_string(),
                selector: selector.to_string(),
            }),
        }
    }

    /// Structure output is required at `Schema` and above.
    pub fn requires_schema(self) -> bool {
        self.rank() >= DumpLevel::Schema.rank()
    }

    /// Data output is required at `NoBlob` and above.
    pub fn requires_data(self) -> bool {
        self.rank() >= DumpLevel::NoBlob.rank()
    }

    /// The configuration token for this level.
    pub fn as_str(self) -> &'static str {
        match self {
            DumpLevel::None => "none",
            DumpLevel::Schema => "schema",
            DumpLevel::NoBlob => "noblob",
            DumpLevel::Masked => "masked",
            DumpLevel::Full => "full",
            DumpLevel::Blank => "blank",
            DumpLevel::Replace => "replace",
        }
    }
}
