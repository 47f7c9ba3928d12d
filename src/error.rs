//! Error kinds reported by the reasoning engine.
//!
//! Every failure is local and recoverable: it names the offending atom, text
//! or limit so the caller can correct the input and retry. Operations that
//! mutate a knowledge base leave it unchanged when they fail.

use thiserror::Error;

use crate::types::Var;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("atom `{0}` already exists")]
    DuplicateName(String),

    #[error("unknown atom `{0}`")]
    UnknownAtom(String),

    #[error("malformed clause: {0}")]
    MalformedClause(String),

    #[error("parse error at {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("decision structure exceeded its budget of {budget} nodes")]
    NodeBudgetExceeded { budget: usize },

    #[error("cannot normalise: the knowledge base is certainly inconsistent")]
    DegenerateNormalization,

    #[error("probability {value} of `{name}` is not in [0, 1]")]
    InvalidProbability { name: String, value: f64 },

    #[error("atom {0} has no probability (not an assumption)")]
    MissingProbability(Var),

    #[error("{atoms} atoms span too many scenarios (limit is {limit})")]
    ScenarioSpaceTooLarge { atoms: usize, limit: usize },

    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("line {line}: {source}")]
    Script { line: usize, source: Box<Error> },
}

impl Error {
    pub(crate) fn parse(position: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            position,
            message: message.into(),
        }
    }
}
