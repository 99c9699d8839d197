use thiserror::Error;

use crate::environment::prelude::{Arity, Expression};

/// Whether a fault comes from the program being run or from a native
/// procedure being handed values it cannot work with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultClass {
    Boundary,
    Invariant,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeFault {
    #[error("there is no binding called `{name}`")]
    UnresolvedName { name: String },
    #[error("cannot apply `{found}`, it is not a procedure")]
    NotCallable { found: String },
    #[error("cannot apply an empty list")]
    EmptyApplication,
    #[error("malformed `{form}`: {reason}")]
    MalformedForm { form: &'static str, reason: String },
    #[error("`{callee}` expects {expected} argument(s), got {got}")]
    ArityMismatch { callee: String, expected: Arity, got: usize },
    #[error("`{callee}` takes {expected} parameter(s), got {got} argument(s)")]
    LambdaArityMismatch { callee: String, expected: usize, got: usize },
    #[error("`{callee}` expects {expected}, got `{found}`")]
    TypeMismatch { callee: String, expected: &'static str, found: String },
    #[error("`{callee}` returned a raw list")]
    RawListResult { callee: String },
    #[error("file descriptor {fd} is not open")]
    BadDescriptor { fd: i64 },
    #[error("file descriptor {fd} is not open for writing")]
    NotWritable { fd: i64 },
    #[error("{code} is not a valid character code")]
    InvalidCharCode { code: i64 },
    #[error("write failed: {kind}")]
    Io { kind: std::io::ErrorKind },
    #[error("program exited with status {code}")]
    Exit { code: i32 },
}

impl RuntimeFault {
    pub fn class(&self) -> FaultClass {
        match self {
            RuntimeFault::ArityMismatch { .. }
            | RuntimeFault::TypeMismatch { .. }
            | RuntimeFault::RawListResult { .. }
            | RuntimeFault::InvalidCharCode { .. } => FaultClass::Invariant,
            _ => FaultClass::Boundary,
        }
    }

    pub fn malformed(form: &'static str, reason: impl Into<String>) -> Self {
        RuntimeFault::MalformedForm { form, reason: reason.into() }
    }

    pub fn type_mismatch(callee: &str, expected: &'static str, found: &Expression) -> Self {
        RuntimeFault::TypeMismatch {
            callee: callee.to_string(),
            expected,
            found: found.to_string(),
        }
    }
}

impl From<std::io::Error> for RuntimeFault {
    fn from(err: std::io::Error) -> Self {
        RuntimeFault::Io { kind: err.kind() }
    }
}
