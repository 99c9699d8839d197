use std::{cell::RefCell, path::PathBuf, rc::Rc};

use termcolor::Buffer;

use crate::interpreter::error::Warning as InterpreterWarning;
use super::diagnostic::{Diagnostic, Label, Level, Location};

/// Destination of warnings raised while a program runs.
pub trait WarningEmitterIO {
    fn emit_warning(&self, warning: Warning);
}

#[derive(Debug, Clone, Copy)]
pub struct NullWarningEmitterIO;

impl WarningEmitterIO for NullWarningEmitterIO {
    fn emit_warning(&self, _warning: Warning) {}
}

/// Keeps warnings in memory, in the order they were raised.
#[derive(Debug, Default, Clone)]
pub struct VectorWarningEmitterIO {
    warnings: Rc<RefCell<Vec<Warning>>>
}

impl VectorWarningEmitterIO {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Warning> {
        std::mem::take(&mut *self.warnings.borrow_mut())
    }
}

impl WarningEmitterIO for VectorWarningEmitterIO {
    fn emit_warning(&self, warning: Warning) {
        self.warnings.borrow_mut().push(warning);
    }
}

/// Attaches the path and text of the program being run to interpreter
/// warnings.
pub struct SourceWarningEmitter {
    path: PathBuf,
    src: String,
    emitter: Rc<dyn WarningEmitterIO>,
}

impl SourceWarningEmitter {
    pub fn new(path: PathBuf, src: String, emitter: Rc<dyn WarningEmitterIO>) -> Self {
        Self { path, src, emitter }
    }

    pub fn emit(&self, warning: InterpreterWarning) {
        self.emitter.emit_warning(Warning::Interpreter {
            path: self.path.clone(),
            src: self.src.clone(),
            warning,
        });
    }
}

#[derive(Debug, Clone)]
pub enum Warning {
    Interpreter {
        path: PathBuf,
        src: String,
        warning: InterpreterWarning
    }
}

impl Warning {
    pub fn pretty_string(&self) -> String {
        let mut nocolor = Buffer::no_color();
        self.pretty(&mut nocolor);
        String::from_utf8(nocolor.into_inner()).expect("Error printing produced invalid utf8")
    }

    pub fn pretty(&self, buf: &mut Buffer) {
        use std::io::Write;

        self.to_diagnostic().write(buf);
        buf.write_all(b"\n")
            .expect("error pretty buffer write space after");
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Warning::Interpreter {
                path,
                src,
                warning
            } => match warning {
                InterpreterWarning::RedefinedNative { location, name } => Diagnostic {
                    title: "Built-in procedure redefined".into(),
                    text: String::new(),
                    notes: vec![format!("Later uses of `{name}` refer to the new definition.")],
                    level: Level::Warning,
                    location: Some(Location {
                        src,
                        path: path.to_path_buf(),
                        labels: vec![Label::primary(*location, format!("`{name}` was a built-in procedure"))],
                    }),
                },
                InterpreterWarning::UnusedValue { location } => Diagnostic {
                    title: "Unused value".into(),
                    text: String::new(),
                    notes: vec![],
                    level: Level::Warning,
                    location: Some(Location {
                        src,
                        path: path.to_path_buf(),
                        labels: vec![Label::primary(*location, "This value is never used")],
                    }),
                },
            }
        }
    }
}
