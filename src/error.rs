use std::num::ParseFloatError;

use thiserror::Error;

use crate::rank::Rank;

/// Failures of the read-only queries
///
/// Mutations never fail: inserting a present rank or removing an absent one is a no-op
/// reported through [`crate::Mutation::applied`].
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum TreeError {
    #[error("no member with rank {0}")]
    KeyNotFound(Rank),

    #[error("the hierarchy is empty")]
    EmptyTree,
}

pub type TreeResult<T> = Result<T, TreeError>;

/// Invalid values passed to [`crate::ConfigBuilder`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("precision must be at most {max} digits, got {got}")]
    Precision { got: usize, max: usize },

    #[error("vacancy label must be a single non-empty word, got {0:?}")]
    VacancyLabel(String),
}

/// Failures while running a command script
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("failed to read or write the script: {0}")]
    Io(#[from] std::io::Error),

    #[error("the script is empty; its first line must name the root member and its rank")]
    MissingRoot,

    #[error("line {line}: `{command}` is missing its {field}")]
    MissingField {
        line: usize,
        command: &'static str,
        field: &'static str,
    },

    #[error("line {line}: invalid rank {value:?}")]
    InvalidRank {
        line: usize,
        value: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("line {line}: unknown command {word:?}")]
    UnknownCommand { line: usize, word: String },

    #[error("line {line}: {source}")]
    Query {
        line: usize,
        #[source]
        source: TreeError,
    },
}

impl ScriptError {
    /// Whether a lenient run may log this and carry on with the next line
    pub fn is_skippable(&self) -> bool {
        matches!(self, ScriptError::UnknownCommand { .. } | ScriptError::Query { .. })
    }
}
