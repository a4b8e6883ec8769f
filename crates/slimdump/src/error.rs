//! Error types for the dump library.

use thiserror::Error;

/// Main error type for dump operations.
#[derive(Error, Debug)]
pub enum DumpError {
    /// Configuration error (malformed document, invalid combination of settings, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unknown dump-level token in a table or column entry
    #[error("Invalid dump type '{token}' for selector '{selector}'")]
    InvalidDumpLevel { token: String, selector: String },

    /// Unknown replacement strategy token
    #[error("Invalid replacement strategy '{token}'")]
    InvalidReplacementStrategy { token: String },

    /// A regex replacement rule was configured without its constraint
    #[error("Replacement strategy 'regex' requires a constraint (column selector '{selector}')")]
    MissingRegexConstraint { selector: String },

    /// A selector or replacement constraint did not compile to a valid pattern
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A replacement value referenced an unknown generator
    #[error("'{0}' is not a valid generator replacement")]
    UnknownGenerator(String),

    /// Value generation failed at dump time
    #[error("Generator error: {0}")]
    Generator(String),

    /// Database connection or query error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO error (output sink, config files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML configuration parse error
    #[error("Config parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// CSV output error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl DumpError {
    /// Create a Config error from anything string-like.
    pub fn config(message: impl Into<String>) -> Self {
        DumpError::Config(message.into())
    }

    /// Whether this error was detected while loading or validating configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            DumpError::Config(_)
                | DumpError::InvalidDumpLevel { .. }
                | DumpError::InvalidReplacementStrategy { .. }
                | DumpError::MissingRegexConstraint { .. }
                | DumpError::InvalidPattern { .. }
                | DumpError::UnknownGenerator(_)
                | DumpError::Yaml(_)
        )
    }

    /// Process exit code for this error class.
    ///
    /// Configuration problems and connectivity problems get distinct codes so
    /// wrapper scripts can tell them apart.
    pub fn exit_code(&self) -> u8 {
        if self.is_config_error() {
            2
        } else if matches!(self, DumpError::Database(_)) {
            3
        } else {
            1
        }
    }

    /// Format error with full details including the error chain.
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for dump operations.
pub type Result<T> = std::result::Result<T, DumpError>;
