use thiserror::Error;

/// Hard errors which abort a parse session.
///
/// An ordinary "input does not match" is not an error; it is reported as
/// [`ParseResult::Failed`](crate::ParseResult::Failed).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("rule `{name}` is not defined")]
    UndefinedRule { name: String },

    #[error("recursion depth limit of {limit} exceeded at position {position}")]
    RecursionLimit { limit: usize, position: usize },

    #[error("input of {length} atoms exceeds the limit of {limit}")]
    InputTooLarge { length: usize, limit: usize },
}

impl ParseError {
    /// True for the errors raised by the caller-imposed resource guards.
    pub fn is_resource_exhaustion(&self) -> bool {
        matches!(
            self,
            ParseError::RecursionLimit { .. } | ParseError::InputTooLarge { .. }
        )
    }
}

/// Errors raised while building a rule table or its expressions.
#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("rule `{0}` is already defined")]
    DuplicateRule(String),

    #[error("rule name must not be empty")]
    EmptyName,

    #[error("invalid regular expression `{pattern}`")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
