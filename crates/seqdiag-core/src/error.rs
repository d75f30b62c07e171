pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Parse error at line {line} column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Unknown statement kind `{kind}` at line {line} column {column}")]
    UnknownStatement {
        kind: String,
        line: usize,
        column: usize,
    },

    #[error("Participant `{participant}` could not belong to two groups")]
    ParticipantInTwoGroups { participant: String },

    #[error("A {kind} statement is not allowed inside {context}")]
    UnexpectedStatement {
        kind: &'static str,
        context: &'static str,
    },
}
