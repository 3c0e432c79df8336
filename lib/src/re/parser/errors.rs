use thiserror::Error;

use crate::Span;

/// Syntax errors found while parsing a regular expression.
///
/// Every variant carries the [`Span`] of the offending text within the
/// pattern. Errors found inside the expansion of a macro point to the place
/// where the macro is referenced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("unexpected character `{ch}`")]
    UnexpectedChar { ch: char, span: Span },

    #[error("unexpected end of pattern")]
    UnexpectedEnd { span: Span },

    #[error("unterminated character class")]
    UnterminatedClass { span: Span },

    #[error("empty character class")]
    EmptyClass { span: Span },

    #[error("invalid range `{first}-{last}`")]
    BackwardRange { first: String, last: String, span: Span },

    #[error("missing `}}` in repetition")]
    MissingBrace { span: Span },

    #[error("invalid repetition")]
    InvalidRepetition { span: Span },

    #[error("too many repetitions")]
    TooManyRepetitions { span: Span },

    #[error("pattern too large")]
    PatternTooLarge { span: Span },

    #[error("nothing to repeat")]
    NothingToRepeat { span: Span },

    #[error("invalid escape sequence")]
    InvalidEscape { span: Span },

    #[error("unknown macro `{name}`")]
    UnknownMacro { name: String, span: Span },

    #[error("recursive macro `{name}`")]
    RecursiveMacro { name: String, span: Span },

    #[error("unbalanced parenthesis")]
    UnbalancedParens { span: Span },

    #[error("malformed expression")]
    MalformedExpression { span: Span },
}

impl Error {
    /// Returns the span of the pattern where the error was found.
    pub fn span(&self) -> &Span {
        match self {
            Error::UnexpectedChar { span, .. }
            | Error::UnexpectedEnd { span }
            | Error::UnterminatedClass { span }
            | Error::EmptyClass { span }
            | Error::BackwardRange { span, .. }
            | Error::MissingBrace { span }
            | Error::InvalidRepetition { span }
            | Error::TooManyRepetitions { span }
            | Error::PatternTooLarge { span }
            | Error::NothingToRepeat { span }
            | Error::InvalidEscape { span }
            | Error::UnknownMacro { span, .. }
            | Error::RecursiveMacro { span, .. }
            | Error::UnbalancedParens { span }
            | Error::MalformedExpression { span } => span,
        }
    }

    /// Returns the error code shown in reports.
    pub fn code(&self) -> &'static str {
        match self {
            Error::UnexpectedChar { .. } => "E001",
            Error::UnexpectedEnd { .. } => "E002",
            Error::UnterminatedClass { .. } => "E003",
            Error::EmptyClass { .. } => "E004",
            Error::BackwardRange { .. } => "E005",
            Error::MissingBrace { .. } => "E006",
            Error::InvalidRepetition { .. } => "E007",
            Error::NothingToRepeat { .. } => "E008",
            Error::InvalidEscape { .. } => "E009",
            Error::UnknownMacro { .. } => "E010",
            Error::RecursiveMacro { .. } => "E011",
            Error::UnbalancedParens { .. } => "E012",
            Error::MalformedExpression { .. } => "E013",
            Error::TooManyRepetitions { .. } => "E014",
            Error::PatternTooLarge { .. } => "E015",
        }
    }

    /// Returns the text of the label that goes below the offending span in
    /// error reports.
    pub fn label(&self) -> String {
        match self {
            Error::UnexpectedChar { .. } => {
                "this character is not allowed here".to_string()
            }
            Error::UnexpectedEnd { .. } => {
                "this is not terminated".to_string()
            }
            Error::UnterminatedClass { .. } => {
                "missing closing `]`".to_string()
            }
            Error::EmptyClass { .. } => {
                "this class doesn't match any byte".to_string()
            }
            Error::BackwardRange { .. } => {
                "the lower bound is greater than the upper bound".to_string()
            }
            Error::MissingBrace { .. } => "expecting `}` here".to_string(),
            Error::InvalidRepetition { .. } => {
                "the upper bound is lower than the lower bound".to_string()
            }
            Error::TooManyRepetitions { .. } => {
                format!("the limit is {} repetitions", super::MAX_REPETITION)
            }
            Error::PatternTooLarge { .. } => {
                "this repetition makes the expanded pattern too large"
                    .to_string()
            }
            Error::NothingToRepeat { .. } => {
                "this doesn't follow any term".to_string()
            }
            Error::InvalidEscape { .. } => {
                "`\\x` must be followed by two hex digits".to_string()
            }
            Error::UnknownMacro { name, .. } => {
                format!("`{}` is not defined", name)
            }
            Error::RecursiveMacro { name, .. } => {
                format!("`{}` refers to itself", name)
            }
            Error::UnbalancedParens { .. } => {
                "this parenthesis doesn't have a pair".to_string()
            }
            Error::MalformedExpression { .. } => {
                "missing operand".to_string()
            }
        }
    }

    /// Returns the same error, but pointing to `span`.
    pub(crate) fn with_span(mut self, new_span: Span) -> Self {
        match &mut self {
            Error::UnexpectedChar { span, .. }
            | Error::UnexpectedEnd { span }
            | Error::UnterminatedClass { span }
            | Error::EmptyClass { span }
            | Error::BackwardRange { span, .. }
            | Error::MissingBrace { span }
            | Error::InvalidRepetition { span }
            | Error::TooManyRepetitions { span }
            | Error::PatternTooLarge { span }
            | Error::NothingToRepeat { span }
            | Error::InvalidEscape { span }
            | Error::UnknownMacro { span, .. }
            | Error::RecursiveMacro { span, .. }
            | Error::UnbalancedParens { span }
            | Error::MalformedExpression { span } => *span = new_span,
        }
        self
    }
}
