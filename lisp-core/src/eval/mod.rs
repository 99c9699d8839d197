pub mod error;
pub mod quote;

pub mod prelude {
    pub use super::{
        apply,
        eval,
        error::*,
        quote::*
    };
}


use std::rc::Rc;

use crate::environment::prelude::{register, resolve, Env, Environment, Expression, Lambda};
use error::RuntimeFault;
use quote::quote_transform;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpecialForm {
    Lambda,
    Define,
    Quote,
    Cond,
}

impl SpecialForm {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "lambda" => Self::Lambda,
            "define" => Self::Define,
            "quote" => Self::Quote,
            "cond" => Self::Cond,
            _ => return None
        })
    }
}

pub fn eval(expression: &Expression, env: &Env) -> Result<Expression, RuntimeFault> {
    match expression {
        Expression::Int(_)
        | Expression::Bool(_)
        | Expression::Lambda(_)
        | Expression::NativeProc(_)
        | Expression::Null => Ok(expression.clone()),
        Expression::Name(name) => resolve(name, env),
        Expression::List(children) => eval_list(children, env),
    }
}

fn eval_list(children: &[Expression], env: &Env) -> Result<Expression, RuntimeFault> {
    let Some(head) = children.first() else {
        return Err(RuntimeFault::EmptyApplication);
    };

    if let Expression::Name(name) = head {
        match SpecialForm::from_name(name) {
            Some(SpecialForm::Lambda) => return eval_lambda(children, env),
            Some(SpecialForm::Define) => return eval_define(children, env),
            Some(SpecialForm::Quote) => return eval_quote(children, env),
            Some(SpecialForm::Cond) => return eval_cond(children, env),
            None => {}
        }
    }

    let callable = match head {
        Expression::Name(name) => resolve(name, env)?,
        Expression::List(_) => eval(head, env)?,
        other => other.clone(),
    };

    // strict, left to right
    let args = children[1..].iter()
        .map(|arg| eval(arg, env))
        .collect::<Result<Vec<Expression>, RuntimeFault>>()?;

    apply(&callable, args)
}

fn eval_lambda(children: &[Expression], env: &Env) -> Result<Expression, RuntimeFault> {
    let params = match children.get(1) {
        Some(Expression::List(params)) => params,
        Some(other) => return Err(RuntimeFault::malformed(
            "lambda",
            format!("expected a parameter list, got `{other}`")
        )),
        None => return Err(RuntimeFault::malformed("lambda", "missing parameter list")),
    };

    let params = params.iter()
        .map(|param| match param {
            Expression::Name(name) => Ok(name.clone()),
            other => Err(RuntimeFault::malformed(
                "lambda",
                format!("parameter `{other}` is not a name")
            )),
        })
        .collect::<Result<Vec<String>, RuntimeFault>>()?;

    Ok(Expression::Lambda(Rc::new(Lambda {
        params,
        body: children[2..].to_vec(),
        env: env.clone(),
    })))
}

fn eval_define(children: &[Expression], env: &Env) -> Result<Expression, RuntimeFault> {
    if children.len() != 3 {
        return Err(RuntimeFault::malformed(
            "define",
            format!("expected a name and a value, got {} operand(s)", children.len() - 1)
        ));
    }

    let Expression::Name(name) = &children[1] else {
        return Err(RuntimeFault::malformed(
            "define",
            format!("`{}` is not a name", children[1])
        ));
    };

    let value = eval(&children[2], env)?;
    register(env, name, value);

    Ok(Expression::Null)
}

fn eval_quote(children: &[Expression], env: &Env) -> Result<Expression, RuntimeFault> {
    if children.len() != 3 {
        return Err(RuntimeFault::malformed(
            "quote",
            format!("expected a join procedure and a literal, got {} operand(s)", children.len() - 1)
        ));
    }

    let join = eval(&children[1], env)?;

    quote_transform(&children[2], &join)
}

fn eval_cond(children: &[Expression], env: &Env) -> Result<Expression, RuntimeFault> {
    for branch in &children[1..] {
        let (test, value) = match branch {
            Expression::List(branch) if branch.len() == 2 => (&branch[0], &branch[1]),
            other => return Err(RuntimeFault::malformed(
                "cond",
                format!("branch `{other}` is not a (test value) pair")
            )),
        };

        if matches!(test, Expression::Name(name) if name == "else") {
            return eval(value, env);
        }

        match eval(test, env)? {
            Expression::Bool(true) => return eval(value, env),
            Expression::Bool(false) => continue,
            other => return Err(RuntimeFault::type_mismatch("cond", "a boolean test", &other)),
        }
    }

    Ok(Expression::Null)
}

pub fn apply(callable: &Expression, args: Vec<Expression>) -> Result<Expression, RuntimeFault> {
    match callable {
        Expression::NativeProc(native) => {
            if !native.arity.accepts(args.len()) {
                return Err(RuntimeFault::ArityMismatch {
                    callee: native.name.to_string(),
                    expected: native.arity,
                    got: args.len(),
                });
            }

            let result = (native.function)(&args, native)?;

            if let Expression::List(_) = result {
                return Err(RuntimeFault::RawListResult { callee: native.name.to_string() });
            }

            Ok(result)
        },
        Expression::Lambda(lambda) => {
            if lambda.params.len() != args.len() {
                return Err(RuntimeFault::LambdaArityMismatch {
                    callee: callable.to_string(),
                    expected: lambda.params.len(),
                    got: args.len(),
                });
            }

            // the closure frame, never the caller's
            let env = Environment::child(&lambda.env);

            for (param, arg) in lambda.params.iter().zip(args) {
                register(&env, param, arg);
            }

            let mut result = Expression::Null;

            for expression in &lambda.body {
                result = eval(expression, &env)?;
            }

            Ok(result)
        },
        other => Err(RuntimeFault::NotCallable { found: other.to_string() }),
    }
}
