use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while converting Markdown to HTML.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("unbalanced `{delimiter}` delimiter in {text:?}")]
    UnbalancedDelimiter {
        delimiter: &'static str,
        text: String,
    },

    #[error("unterminated {marker} in {text:?}: expected a closing `(url)`")]
    UnterminatedMedia { marker: &'static str, text: String },

    #[error("heading has no content: {block:?}")]
    InvalidHeading { block: String },

    #[error("code block is missing a ``` fence: {block:?}")]
    InvalidCodeBlock { block: String },

    #[error("quote line does not start with `>`: {line:?}")]
    InvalidQuote { line: String },

    #[error("invalid tree: {reason}")]
    InvalidTree { reason: String },

    #[error("block matched no known type: {block:?}")]
    InvalidBlockType { block: String },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure to load a TOML configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
