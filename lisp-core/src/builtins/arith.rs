use crate::{
    environment::prelude::{Expression, NativeProc},
    eval::prelude::RuntimeFault
};

use super::int_arg;

fn int_pair(args: &[Expression], this: &NativeProc) -> Result<(i64, i64), RuntimeFault> {
    Ok((int_arg(this.name, &args[0])?, int_arg(this.name, &args[1])?))
}

pub fn add(args: &[Expression], this: &NativeProc) -> Result<Expression, RuntimeFault> {
    let (left, right) = int_pair(args, this)?;
    Ok(Expression::Int(left.wrapping_add(right)))
}

pub fn sub(args: &[Expression], this: &NativeProc) -> Result<Expression, RuntimeFault> {
    let (left, right) = int_pair(args, this)?;
    Ok(Expression::Int(left.wrapping_sub(right)))
}

pub fn mul(args: &[Expression], this: &NativeProc) -> Result<Expression, RuntimeFault> {
    let (left, right) = int_pair(args, this)?;
    Ok(Expression::Int(left.wrapping_mul(right)))
}

pub fn eq(args: &[Expression], this: &NativeProc) -> Result<Expression, RuntimeFault> {
    let (left, right) = int_pair(args, this)?;
    Ok(Expression::Bool(left == right))
}

pub fn gt(args: &[Expression], this: &NativeProc) -> Result<Expression, RuntimeFault> {
    let (left, right) = int_pair(args, this)?;
    Ok(Expression::Bool(left > right))
}

pub fn is_nil(args: &[Expression], _this: &NativeProc) -> Result<Expression, RuntimeFault> {
    Ok(Expression::Bool(matches!(args[0], Expression::Null)))
}

/// Ends the program with the given status; `nil` means 0. Statuses
/// outside `0..=255` are rejected.
pub fn exit(args: &[Expression], this: &NativeProc) -> Result<Expression, RuntimeFault> {
    let code = match &args[0] {
        Expression::Null => 0,
        other => match int_arg(this.name, other)? {
            code @ 0..=255 => code as i32,
            _ => return Err(RuntimeFault::type_mismatch(this.name, "a status between 0 and 255", other)),
        },
    };

    Err(RuntimeFault::Exit { code })
}
