use std::{cell::RefCell, fmt::{Debug, Display}, rc::Rc};

use crate::{builtins::prelude::FileTable, eval::prelude::RuntimeFault};

use super::environment::Env;

pub const TRUE: Expression = Expression::Bool(true);
pub const FALSE: Expression = Expression::Bool(false);

/// Signature of every native procedure. The argument count is the slice
/// length, the second argument is the procedure being applied.
pub type NativeFn = fn(&[Expression], &NativeProc) -> Result<Expression, RuntimeFault>;

#[derive(Clone)]
pub enum Expression {
    Int(i64),
    Bool(bool),
    Name(String),
    List(Vec<Expression>),
    Lambda(Rc<Lambda>),
    NativeProc(Rc<NativeProc>),
    Null,
}

impl Expression {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Bool(_) => "bool",
            Self::Name(_) => "name",
            Self::List(_) => "list",
            Self::Lambda(_) => "lambda",
            Self::NativeProc(_) => "native",
            Self::Null => "nil",
        }
    }

    pub fn native(native: NativeProc) -> Self {
        Self::NativeProc(Rc::new(native))
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(left), Self::Int(right)) => left == right,
            (Self::Bool(left), Self::Bool(right)) => left == right,
            (Self::Name(left), Self::Name(right)) => left == right,
            (Self::List(left), Self::List(right)) => left == right,
            (Self::Lambda(left), Self::Lambda(right)) => Rc::ptr_eq(left, right),
            (Self::NativeProc(left), Self::NativeProc(right)) => Rc::ptr_eq(left, right),
            (Self::Null, Self::Null) => true,
            _ => false,
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Name(name) => write!(f, "{name}"),
            Self::List(children) => {
                let children = children.iter()
                    .map(|child| child.to_string())
                    .collect::<Vec<String>>()
                    .join(" ");

                write!(f, "({children})")
            },
            Self::Lambda(lambda) => write!(f, "#<lambda ({})>", lambda.params.join(" ")),
            Self::NativeProc(native) => write!(f, "#<native {}>", native.name),
            Self::Null => write!(f, "nil"),
        }
    }
}

impl Debug for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(value) => write!(f, "Int({value})"),
            Self::Bool(value) => write!(f, "Bool({value})"),
            Self::Name(name) => write!(f, "Name({name:?})"),
            Self::List(children) => f.debug_tuple("List").field(children).finish(),
            Self::Lambda(lambda) => Debug::fmt(lambda.as_ref(), f),
            Self::NativeProc(native) => Debug::fmt(native.as_ref(), f),
            Self::Null => write!(f, "Null"),
        }
    }
}

pub struct Lambda {
    pub params: Vec<String>,
    pub body: Vec<Expression>,
    pub env: Env,
}

// The closure frame usually refers back to the lambda itself, so it is left out.
impl Debug for Lambda {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lambda")
            .field("params", &self.params)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exact(expected) => count == expected,
            Arity::AtLeast(minimum) => count >= minimum,
        }
    }
}

impl Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arity::Exact(expected) => write!(f, "{expected}"),
            Arity::AtLeast(minimum) => write!(f, "at least {minimum}"),
        }
    }
}

/// Data a native procedure carries besides its captured frame.
pub enum Payload {
    Pair(Expression, Expression),
    Procedures(Vec<Expression>),
    Files(Rc<RefCell<FileTable>>),
    Arguments(Rc<[String]>),
}

pub struct NativeProc {
    pub name: &'static str,
    pub arity: Arity,
    pub function: NativeFn,
    pub env: Option<Env>,
    pub payload: Option<Payload>,
}

impl NativeProc {
    pub fn new(name: &'static str, arity: Arity, function: NativeFn) -> Self {
        Self {
            name,
            arity,
            function,
            env: None,
            payload: None,
        }
    }

    pub fn with_env(mut self, env: Env) -> Self {
        self.env = Some(env);
        self
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }
}

impl Debug for NativeProc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let payload = match &self.payload {
            None => "none",
            Some(Payload::Pair(..)) => "pair",
            Some(Payload::Procedures(..)) => "procedures",
            Some(Payload::Files(..)) => "files",
            Some(Payload::Arguments(..)) => "arguments",
        };

        f.debug_struct("NativeProc")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("captures_env", &self.env.is_some())
            .field("payload", &payload)
            .finish()
    }
}
