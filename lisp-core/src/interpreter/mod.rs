pub mod error;

pub mod prelude {
    pub use super::{
        error::*,
        Config,
        Fault,
        Interpreter,
        read_source,
        run_file,
        run_file_with
    };
}

#[cfg(test)]
mod tests;

use std::{cell::RefCell, path::{Path, PathBuf}, rc::Rc};

use utf8_chars::BufReadCharsExt;

use crate::{
    builtins::prelude::{install, FileTable},
    environment::prelude::{Env, Environment, Expression},
    eval::prelude::{eval, RuntimeFault},
    parser::prelude::{parser_from_stream, ParseError, Parser, ParserConfig},
    utils::prelude::{Error, SourceWarningEmitter, SrcSpan, WarningEmitterIO}
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub parser: ParserConfig,
    /// Exposed to programs through `argv` and `main&`.
    pub argv: Vec<String>,
}

/// Owns the global frame and the file table its I/O procedures share.
pub struct Interpreter {
    global: Env,
    files: Rc<RefCell<FileTable>>,
}

impl Interpreter {
    pub fn new(argv: Vec<String>) -> Self {
        Self::with_files(FileTable::standard(), argv)
    }

    pub fn with_files(files: FileTable, argv: Vec<String>) -> Self {
        let global = Environment::new_ref();
        let files = Rc::new(RefCell::new(files));

        install(&global, files.clone(), argv.into());

        Self { global, files }
    }

    pub fn eval(&self, expression: &Expression) -> Result<Expression, RuntimeFault> {
        eval(expression, &self.global)
    }

    /// Parses and evaluates one top-level form at a time until the stream
    /// ends, so each form runs before the next one is read. The first fault
    /// stops the run.
    pub fn run<T: Iterator<Item = (u32, char)>>(
        &self,
        parser: &mut Parser<T>,
        warnings: &SourceWarningEmitter,
    ) -> Result<(), Fault> {
        let result = self.run_forms(parser, warnings);

        // output written before a fault or `exit` must still reach its sink
        let flushed = self.files.borrow_mut().flush()
            .map_err(|fault| Fault::Runtime(fault, SrcSpan::point(parser.offset())));

        result.and(flushed)
    }

    fn run_forms<T: Iterator<Item = (u32, char)>>(
        &self,
        parser: &mut Parser<T>,
        warnings: &SourceWarningEmitter,
    ) -> Result<(), Fault> {
        for form in parser {
            let (start, expression, end) = form.map_err(Fault::Parse)?;
            let location = SrcSpan::from(start, end);

            self.check_redefinition(&expression, location, warnings);

            let value = self.eval(&expression)
                .map_err(|fault| Fault::Runtime(fault, location))?;

            if !matches!(value, Expression::Null) && !is_define(&expression) {
                warnings.emit(error::Warning::UnusedValue { location });
            }
        }

        Ok(())
    }

    pub fn run_source(
        &self,
        path: PathBuf,
        src: &str,
        config: ParserConfig,
        warnings: Rc<dyn WarningEmitterIO>,
    ) -> Result<(), Error> {
        let warnings = SourceWarningEmitter::new(path.clone(), src.to_string(), warnings);

        let mut parser = parser_from_stream(src.chars(), config);

        self.run(&mut parser, &warnings)
            .map_err(|fault| fault.into_error(path, src.to_string()))
    }

    fn check_redefinition(&self, expression: &Expression, location: SrcSpan, warnings: &SourceWarningEmitter) {
        let Expression::List(children) = expression else {
            return;
        };

        if let [Expression::Name(head), Expression::Name(name), _] = children.as_slice() {
            if head == "define" {
                if let Some(Expression::NativeProc(_)) = self.global.borrow().get(name) {
                    warnings.emit(error::Warning::RedefinedNative {
                        location,
                        name: name.clone(),
                    });
                }
            }
        }
    }
}

fn is_define(expression: &Expression) -> bool {
    matches!(
        expression,
        Expression::List(children) if matches!(children.first(), Some(Expression::Name(head)) if head == "define")
    )
}

/// What stopped a run, before it is tied to a source file.
#[derive(Debug, Clone, PartialEq)]
pub enum Fault {
    Parse(ParseError),
    Runtime(RuntimeFault, SrcSpan),
}

impl Fault {
    pub fn into_error(self, path: PathBuf, src: String) -> Error {
        match self {
            Fault::Parse(error) => Error::Parse { path, src, error },
            Fault::Runtime(RuntimeFault::Exit { code }, _) => Error::Exit { code },
            Fault::Runtime(fault, span) => Error::Runtime { path, src, fault, span },
        }
    }
}

/// Runs `path` with a fresh interpreter on the standard file table.
pub fn run_file(
    path: &Path,
    config: &Config,
    warnings: Rc<dyn WarningEmitterIO>,
) -> Result<(), Error> {
    let interpreter = Interpreter::new(config.argv.clone());

    run_file_with(&interpreter, path, config.parser, warnings)
}

/// Reads `path` as UTF-8 and runs it on `interpreter`.
pub fn run_file_with(
    interpreter: &Interpreter,
    path: &Path,
    config: ParserConfig,
    warnings: Rc<dyn WarningEmitterIO>,
) -> Result<(), Error> {
    let src = read_source(path)?;

    interpreter.run_source(path.to_path_buf(), &src, config, warnings)
}

pub fn read_source(path: &Path) -> Result<String, Error> {
    let io_error = |err: std::io::Error| Error::StdIo { path: path.to_path_buf(), err: err.kind() };

    let file = std::fs::File::open(path).map_err(io_error)?;
    let file_size = file.metadata().map_err(io_error)?.len() as usize;

    let mut src = String::with_capacity(file_size);
    let mut reader = std::io::BufReader::new(file);

    for c in reader.chars() {
        src.push(c.map_err(io_error)?);
    }

    Ok(src)
}
