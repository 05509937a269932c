use thiserror::Error;

/// Why a DIMACS CNF input could not be loaded
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("missing `p cnf <variables> <clauses>` header")]
    MissingHeader,

    #[error("invalid header: {0:?}")]
    InvalidHeader(String),

    /// A clause line which is not a list of literals ending in a single `0`
    #[error("line {line}: invalid clause {text:?}")]
    InvalidClauseLine { line: usize, text: String },

    #[error("line {line}: variable {var} is not declared in the header")]
    UndeclaredVariable { line: usize, var: usize },

    #[error("expected {expected} clauses, found {found}")]
    MissingClause { expected: usize, found: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
