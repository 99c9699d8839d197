use std::path::PathBuf;

use termcolor::Buffer;
use thiserror::Error;

use crate::{
    eval::prelude::{FaultClass, RuntimeFault},
    parser::prelude::{ParseError, ParseErrorType},
    utils::prelude::SrcSpan,
};
use super::diagnostic::{Diagnostic, Label, Level, Location};

/// The source file could not be opened or read.
pub const PRE_PARSE_ERROR: i32 = 1;
pub const PARSE_ERROR: i32 = 2;
/// Unresolved names, bad applications and native procedure faults.
pub const RUNTIME_ERROR: i32 = 3;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("failed to parse source code")]
    Parse {
        path: PathBuf,
        src: String,
        error: ParseError
    },
    #[error("evaluation failed: {fault}")]
    Runtime {
        path: PathBuf,
        src: String,
        fault: RuntimeFault,
        span: SrcSpan
    },
    #[error("program exited with status {code}")]
    Exit {
        code: i32
    },
    #[error("IO operation failed")]
    StdIo {
        path: PathBuf,
        err: std::io::ErrorKind
    }
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::StdIo { .. } => PRE_PARSE_ERROR,
            Error::Parse { .. } => PARSE_ERROR,
            Error::Runtime { .. } => RUNTIME_ERROR,
            Error::Exit { code } => *code,
        }
    }

    pub fn pretty_string(&self) -> String {
        let mut nocolor = Buffer::no_color();
        self.pretty(&mut nocolor);
        String::from_utf8(nocolor.into_inner()).expect("Error printing produced invalid utf8")
    }

    pub fn pretty(&self, buf: &mut Buffer) {
        use std::io::Write;

        for diagnostic in self.to_diagnostics() {
            diagnostic.write(buf);
            writeln!(buf).expect("write new line diagnostic");
        }
    }

    pub fn to_diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            Error::Parse { path, src, error } => {
                let (label, extra) = error.details();
                let mut labels = vec![];

                if matches!(
                    error.error,
                    ParseErrorType::UnterminatedList | ParseErrorType::UnterminatedString
                ) {
                    // point at the opening delimiter, then at the end of input
                    let opening = SrcSpan::from(error.span.start, (error.span.start + 1).min(src.len() as u32));
                    labels.push(Label::primary(opening, label));

                    if let Some((last, ch)) = src.char_indices().next_back() {
                        let end = SrcSpan::from(last as u32, (last + ch.len_utf8()) as u32);
                        labels.push(Label::secondary(end, "input ends here"));
                    }
                } else {
                    labels.push(Label::primary(error.span, label));
                }

                vec![Diagnostic {
                    title: "Syntax error".into(),
                    text: extra.join("\n"),
                    notes: vec![],
                    level: Level::Error,
                    location: Some(Location {
                        src,
                        path: path.clone(),
                        labels,
                    }),
                }]
            },
            Error::Runtime { path, src, fault, span } => {
                let (title, notes) = match fault.class() {
                    FaultClass::Boundary => ("Runtime error", vec![]),
                    FaultClass::Invariant => (
                        "Native procedure fault",
                        vec!["A built-in procedure was applied to values it cannot handle.".to_string()]
                    ),
                };

                vec![Diagnostic {
                    title: title.into(),
                    text: String::new(),
                    notes,
                    level: Level::Error,
                    location: Some(Location {
                        src,
                        path: path.clone(),
                        labels: vec![Label::primary(*span, fault.to_string())],
                    }),
                }]
            },
            Error::Exit { .. } => vec![],
            Error::StdIo { path, err } => {
                vec![Diagnostic {
                    title: "Standard IO error".into(),
                    text: format!("cannot read `{}`: {err}", path.display()),
                    notes: vec![],
                    level: Level::Error,
                    location: None,
                }]
            }
        }
    }
}
