use crate::utils::prelude::SrcSpan;

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorType {
    DigitLedName,
    IntegerOverflow,
    NameTooLong { limit: usize },
    ListTooLong { limit: usize },
    BadEscape { ch: char },
    UnterminatedString,
    UnterminatedList,
    UnbalancedParen,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub error: ParseErrorType,
    pub span: SrcSpan
}

impl ParseError {
    pub fn details(&self) -> (&'static str, Vec<String>) {
        match &self.error {
            ParseErrorType::DigitLedName => ("Name must not start with a digit", vec![]),
            ParseErrorType::IntegerOverflow => (
                "Integer literal is too large",
                vec![format!("Integers must fit in {} bits.", i64::BITS)]
            ),
            ParseErrorType::NameTooLong { limit } => (
                "Name is too long",
                vec![format!("Names may have at most {limit} characters.")]
            ),
            ParseErrorType::ListTooLong { limit } => (
                "List has too many elements",
                vec![format!("Lists may have at most {limit} elements.")]
            ),
            ParseErrorType::BadEscape { ch } => (
                "Unknown escape sequence",
                vec![
                    format!("Found `\\{ch}`, expected one of: "),
                    "- \\n".into(),
                    "- \\t".into(),
                    "- \\'".into(),
                    "- \\\\".into(),
                ]
            ),
            ParseErrorType::UnterminatedString => ("Missing closing `'`", vec![]),
            ParseErrorType::UnterminatedList => ("Missing closing `)`", vec![]),
            ParseErrorType::UnbalancedParen => ("Unexpected `)`", vec![]),
        }
    }
}

pub fn parse_error<T>(error: ParseErrorType, span: SrcSpan) -> Result<T, ParseError> {
    Err(ParseError { error, span })
}
