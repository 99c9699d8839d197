use std::io::Write;

use lisp_core::{
    environment::prelude::Expression,
    interpreter::prelude::{Fault, Interpreter},
    parser::prelude::{parser_from_stream, ParseError, ParseErrorType, ParserConfig, Spanned},
    utils::prelude::{Error, SrcSpan}
};

const PROMPT: &str = ">> ";
const CONTINUATION_PROMPT: &str = ".. ";
const REPL_PATH: &str = "<repl>";

/// Reads forms from stdin and prints every non-`nil` value. Lines are
/// joined until the input holds only complete forms. Faults are reported
/// and the session goes on, `exit` ends it.
pub fn start(interpreter: &Interpreter, config: ParserConfig) -> Result<(), Error> {
    if let Err(err) = ctrlc::set_handler(|| std::process::exit(0)) {
        eprintln!("Ctrl-C handler not installed: {err}");
    }

    let stdin = std::io::stdin();
    let mut input = String::new();

    loop {
        let prompt = if input.is_empty() { PROMPT } else { CONTINUATION_PROMPT };

        print!("{prompt}");
        std::io::stdout().flush().map_err(stdio_error)?;

        let mut line = String::new();
        if stdin.read_line(&mut line).map_err(stdio_error)? == 0 {
            return Ok(());
        }

        if let Some('\n') = line.chars().next_back() {
            line.pop();
        }
        if let Some('\r') = line.chars().next_back() {
            line.pop();
        }

        if input.is_empty() {
            match line.as_str() {
                "" => continue,
                ".exit" => return Ok(()),
                _ => {}
            }
        }

        input.push_str(&line);
        input.push('\n');

        let forms = match read_forms(&input, config) {
            Ok(forms) => forms,
            Err(error) if is_incomplete(&error) => continue,
            Err(error) => {
                let src = std::mem::take(&mut input);
                crate::report(&Error::Parse { path: REPL_PATH.into(), src, error });
                continue;
            }
        };

        let src = std::mem::take(&mut input);

        for (start, expression, end) in forms {
            match interpreter.eval(&expression) {
                Ok(Expression::Null) => {},
                Ok(value) => println!("{value}"),
                Err(fault) => {
                    let err = Fault::Runtime(fault, SrcSpan::from(start, end))
                        .into_error(REPL_PATH.into(), src.clone());

                    if let Error::Exit { .. } = err {
                        return Err(err);
                    }

                    crate::report(&err);
                    break;
                }
            }
        }
    }
}

fn read_forms(input: &str, config: ParserConfig) -> Result<Vec<Spanned>, ParseError> {
    parser_from_stream(input.chars(), config).collect()
}

fn is_incomplete(error: &ParseError) -> bool {
    matches!(error.error, ParseErrorType::UnterminatedList | ParseErrorType::UnterminatedString)
}

fn stdio_error(err: std::io::Error) -> Error {
    Error::StdIo { path: REPL_PATH.into(), err: err.kind() }
}
