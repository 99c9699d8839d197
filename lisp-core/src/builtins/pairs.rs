use crate::{
    environment::prelude::{Arity, Expression, NativeProc, Payload},
    eval::prelude::{apply, RuntimeFault}
};

/// Builds a two-slot pair. Applying the pair to `f` calls `(f first second)`.
pub fn pair(first: Expression, second: Expression) -> Expression {
    Expression::native(
        NativeProc::new("pair", Arity::Exact(1), select)
            .with_payload(Payload::Pair(first, second))
    )
}

fn slots(callee: &str, value: &Expression) -> Result<(Expression, Expression), RuntimeFault> {
    if let Expression::NativeProc(native) = value {
        if let Some(Payload::Pair(first, second)) = &native.payload {
            return Ok((first.clone(), second.clone()));
        }
    }

    Err(RuntimeFault::type_mismatch(callee, "a pair", value))
}

fn select(args: &[Expression], this: &NativeProc) -> Result<Expression, RuntimeFault> {
    let Some(Payload::Pair(first, second)) = &this.payload else {
        return Err(RuntimeFault::type_mismatch(this.name, "a pair payload", &Expression::Null));
    };

    apply(&args[0], vec![first.clone(), second.clone()])
}

pub fn cons(args: &[Expression], _this: &NativeProc) -> Result<Expression, RuntimeFault> {
    Ok(pair(args[0].clone(), args[1].clone()))
}

pub fn car(args: &[Expression], this: &NativeProc) -> Result<Expression, RuntimeFault> {
    slots(this.name, &args[0]).map(|(first, _)| first)
}

pub fn cdr(args: &[Expression], this: &NativeProc) -> Result<Expression, RuntimeFault> {
    slots(this.name, &args[0]).map(|(_, second)| second)
}
