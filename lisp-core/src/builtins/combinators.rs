use crate::{
    environment::prelude::{register, resolve, Arity, Environment, Expression, NativeProc, Payload},
    eval::prelude::{apply, quote_transform, RuntimeFault},
    parser::prelude::desugar_string
};

const FOLD_CALLBACK: &str = "callback";
const FOLD_INIT: &str = "init";

/// `(foldr f init)` returns a procedure that right-folds its arguments.
/// The callback is applied as `(f item result)`, so `(foldr cons nil)`
/// rebuilds its arguments as nested pairs.
pub fn foldr(args: &[Expression], _this: &NativeProc) -> Result<Expression, RuntimeFault> {
    let env = Environment::new_ref();
    register(&env, FOLD_CALLBACK, args[0].clone());
    register(&env, FOLD_INIT, args[1].clone());

    Ok(Expression::native(
        NativeProc::new("foldr&", Arity::AtLeast(0), fold_arguments).with_env(env)
    ))
}

fn fold_arguments(args: &[Expression], this: &NativeProc) -> Result<Expression, RuntimeFault> {
    let Some(env) = &this.env else {
        return Err(RuntimeFault::UnresolvedName { name: FOLD_CALLBACK.into() });
    };

    let callback = resolve(FOLD_CALLBACK, env)?;
    let mut product = resolve(FOLD_INIT, env)?;

    for arg in args.iter().rev() {
        product = apply(&callback, vec![arg.clone(), product])?;
    }

    Ok(product)
}

/// `(pipe f1 .. fk)` returns a procedure feeding its arguments to `f1` and
/// each result on to the next procedure.
pub fn pipe(args: &[Expression], _this: &NativeProc) -> Result<Expression, RuntimeFault> {
    Ok(Expression::native(
        NativeProc::new("pipe&", Arity::AtLeast(0), run_pipe)
            .with_payload(Payload::Procedures(args.to_vec()))
    ))
}

fn run_pipe(args: &[Expression], this: &NativeProc) -> Result<Expression, RuntimeFault> {
    let Some(Payload::Procedures(procedures)) = &this.payload else {
        return Err(RuntimeFault::type_mismatch(this.name, "a procedure list", &Expression::Null));
    };

    let Some((first, rest)) = procedures.split_first() else {
        return Err(RuntimeFault::ArityMismatch {
            callee: "pipe".into(),
            expected: Arity::AtLeast(1),
            got: 0,
        });
    };

    let mut result = apply(first, args.to_vec())?;

    for procedure in rest {
        result = apply(procedure, vec![result])?;
    }

    Ok(result)
}

/// The argument vector as a literal: `(s0 (s1 .. nil))`, each string
/// desugared the way string literals are.
fn argument_literal(this: &NativeProc) -> Result<(usize, Expression), RuntimeFault> {
    let Some(Payload::Arguments(arguments)) = &this.payload else {
        return Err(RuntimeFault::type_mismatch(this.name, "an argument vector", &Expression::Null));
    };

    let literal = arguments.iter()
        .rev()
        .fold(Expression::Null, |rest, argument| {
            Expression::List(vec![desugar_string(argument), rest])
        });

    Ok((arguments.len(), literal))
}

/// `(argv join)` decodes the argument vector through `join`.
pub fn argv(args: &[Expression], this: &NativeProc) -> Result<Expression, RuntimeFault> {
    let (_, literal) = argument_literal(this)?;

    quote_transform(&literal, &args[0])
}

/// `(main& join k)` calls `(k argc argv)` with the vector decoded by `join`.
pub fn main_continuation(args: &[Expression], this: &NativeProc) -> Result<Expression, RuntimeFault> {
    let (count, literal) = argument_literal(this)?;
    let vector = quote_transform(&literal, &args[0])?;

    apply(&args[1], vec![Expression::Int(count as i64), vector])
}
