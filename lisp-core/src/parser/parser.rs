use crate::{environment::prelude::Expression, utils::prelude::SrcSpan};
use super::error::{parse_error, ParseError, ParseErrorType};

pub const DEFAULT_MAX_NAME_LEN: usize = 32;
pub const DEFAULT_MAX_LIST_LEN: usize = 64;

pub type Spanned = (u32, Expression, u32);

#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Expression(Spanned),
    /// A comment ran up to a closing paren, nothing was read.
    Nothing,
    EndOfStream,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    pub max_name_len: usize,
    pub max_list_len: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_name_len: DEFAULT_MAX_NAME_LEN,
            max_list_len: DEFAULT_MAX_LIST_LEN,
        }
    }
}

/// Recursive-descent reader with a single character of lookahead.
#[derive(Debug)]
pub struct Parser<T: Iterator<Item = (u32, char)>> {
    position: u32,
    ch: Option<char>,
    input: T,
    config: ParserConfig,
}

impl<T: Iterator<Item = (u32, char)>> Parser<T> {
    pub fn new(input: T) -> Self {
        Self::with_config(input, ParserConfig::default())
    }

    pub fn with_config(input: T, config: ParserConfig) -> Self {
        let mut parser = Self {
            position: 0,
            ch: None,
            input,
            config,
        };

        parser.next_char();

        parser
    }

    /// Byte offset of the character under the cursor.
    pub fn offset(&self) -> u32 {
        self.position
    }

    pub fn parse(&mut self) -> Result<ParseOutcome, ParseError> {
        self.skip_whitespace();

        let start = self.position;

        match self.ch {
            None => Ok(ParseOutcome::EndOfStream),
            Some(';') => {
                self.skip_comment();
                self.skip_whitespace();

                if self.ch == Some(')') {
                    Ok(ParseOutcome::Nothing)
                } else {
                    self.parse()
                }
            },
            Some(')') => parse_error(
                ParseErrorType::UnbalancedParen,
                SrcSpan::from(start, start + 1)
            ),
            Some('(') => self.parse_list(),
            Some('\'') => self.parse_string(),
            Some(ch) if ch.is_ascii_digit() => self.parse_int(),
            Some(_) => self.parse_name(),
        }
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.ch;

        match self.input.next() {
            Some((pos, next)) => {
                self.position = pos;
                self.ch = Some(next);
            },
            None => {
                if let Some(last) = ch {
                    self.position += last.len_utf8() as u32;
                }
                self.ch = None;
            }
        }

        ch
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.ch, Some(ch) if ch.is_whitespace()) {
            self.next_char();
        }
    }

    fn skip_comment(&mut self) {
        while let Some(ch) = self.next_char() {
            if ch == '\n' {
                break;
            }
        }
    }

    fn parse_list(&mut self) -> Result<ParseOutcome, ParseError> {
        let start = self.position;
        self.next_char(); // skip `(`

        let mut children = vec![];

        loop {
            self.skip_whitespace();

            match self.ch {
                Some(')') => {
                    self.next_char();
                    break;
                },
                None => return parse_error(
                    ParseErrorType::UnterminatedList,
                    SrcSpan::from(start, self.position)
                ),
                Some(_) => {
                    let child_start = self.position;

                    match self.parse()? {
                        ParseOutcome::Expression((_, child, _)) => {
                            if children.len() == self.config.max_list_len {
                                return parse_error(
                                    ParseErrorType::ListTooLong { limit: self.config.max_list_len },
                                    SrcSpan::from(child_start, self.position)
                                );
                            }

                            children.push(child);
                        },
                        ParseOutcome::Nothing => {},
                        ParseOutcome::EndOfStream => return parse_error(
                            ParseErrorType::UnterminatedList,
                            SrcSpan::from(start, self.position)
                        ),
                    }
                }
            }
        }

        Ok(ParseOutcome::Expression((start, Expression::List(children), self.position)))
    }

    fn parse_int(&mut self) -> Result<ParseOutcome, ParseError> {
        let start = self.position;
        let mut value: i64 = 0;
        let mut overflowed = false;

        while let Some(digit) = self.ch.and_then(|ch| ch.to_digit(10)) {
            self.next_char();

            match value.checked_mul(10).and_then(|value| value.checked_add(digit as i64)) {
                Some(next) => value = next,
                None => overflowed = true,
            }
        }

        match self.ch {
            None | Some('(') | Some(')') => {},
            Some(ch) if ch.is_whitespace() => {},
            Some(_) => {
                while matches!(self.ch, Some(ch) if !is_delimiter(ch)) {
                    self.next_char();
                }

                return parse_error(
                    ParseErrorType::DigitLedName,
                    SrcSpan::from(start, self.position)
                );
            }
        }

        if overflowed {
            return parse_error(
                ParseErrorType::IntegerOverflow,
                SrcSpan::from(start, self.position)
            );
        }

        Ok(ParseOutcome::Expression((start, Expression::Int(value), self.position)))
    }

    fn parse_name(&mut self) -> Result<ParseOutcome, ParseError> {
        let start = self.position;
        let mut name = String::new();
        let mut len = 0;

        while let Some(ch) = self.ch {
            if is_delimiter(ch) {
                break;
            }

            name.push(ch);
            len += 1;
            self.next_char();
        }

        if len > self.config.max_name_len {
            return parse_error(
                ParseErrorType::NameTooLong { limit: self.config.max_name_len },
                SrcSpan::from(start, self.position)
            );
        }

        let expression = if name == "nil" {
            Expression::Null
        } else {
            Expression::Name(name)
        };

        Ok(ParseOutcome::Expression((start, expression, self.position)))
    }

    fn parse_string(&mut self) -> Result<ParseOutcome, ParseError> {
        let start = self.position;
        self.next_char(); // skip opening quote

        let mut text = String::new();

        loop {
            let escape_start = self.position;

            match self.next_char() {
                None => return parse_error(
                    ParseErrorType::UnterminatedString,
                    SrcSpan::from(start, self.position)
                ),
                Some('\'') => break,
                Some('\\') => match self.next_char() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some('\'') => text.push('\''),
                    Some('\\') => text.push('\\'),
                    Some(ch) => return parse_error(
                        ParseErrorType::BadEscape { ch },
                        SrcSpan::from(escape_start, self.position)
                    ),
                    None => return parse_error(
                        ParseErrorType::UnterminatedString,
                        SrcSpan::from(start, self.position)
                    ),
                },
                Some(ch) => text.push(ch),
            }
        }

        Ok(ParseOutcome::Expression((start, desugar_string(&text), self.position)))
    }
}

impl<T: Iterator<Item = (u32, char)>> Iterator for Parser<T> {
    type Item = Result<Spanned, ParseError>;

    /// Yields top-level expressions, skipping empty reads.
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.parse() {
                Ok(ParseOutcome::Expression(spanned)) => return Some(Ok(spanned)),
                Ok(ParseOutcome::Nothing) => continue,
                Ok(ParseOutcome::EndOfStream) => return None,
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

fn is_delimiter(ch: char) -> bool {
    ch.is_whitespace() || ch == '(' || ch == ')'
}

/// Turns text into a right-nested chain of code points:
/// `ab` becomes `(97 (98 nil))`.
pub fn desugar_string(text: &str) -> Expression {
    text.chars()
        .rev()
        .fold(Expression::Null, |rest, ch| {
            Expression::List(vec![Expression::Int(ch as i64), rest])
        })
}

pub fn parse_program(src: &str) -> Result<Vec<Spanned>, ParseError> {
    Parser::new(src.char_indices().map(|(i, c)| (i as u32, c))).collect()
}

pub fn parse_expression(src: &str) -> Result<Option<Expression>, ParseError> {
    let mut parser = Parser::new(src.char_indices().map(|(i, c)| (i as u32, c)));

    match parser.next() {
        Some(spanned) => spanned.map(|(_, expression, _)| Some(expression)),
        None => Ok(None),
    }
}

/// Builds a parser over a char stream, tracking byte offsets for spans.
pub fn parser_from_stream(
    stream: impl Iterator<Item = char>,
    config: ParserConfig
) -> Parser<impl Iterator<Item = (u32, char)>> {
    Parser::with_config(
        stream.scan(0, |pos, c| {
            *pos += c.len_utf8() as u32;
            Some((*pos - c.len_utf8() as u32, c))
        }),
        config
    )
}
