pub mod arith;
pub mod combinators;
pub mod io;
pub mod pairs;

pub mod prelude {
    pub use super::{
        install,
        io::{Access, FileTable, FILE_TABLE_SIZE, STDERR, STDIN, STDOUT},
        pairs::pair
    };
}

#[cfg(test)]
mod tests;

use std::{cell::RefCell, rc::Rc};

use crate::{
    environment::prelude::{register, Arity, Env, Expression, NativeFn, NativeProc, Payload, FALSE, TRUE},
    eval::prelude::RuntimeFault
};
use io::FileTable;

/// Seeds `env` with the native procedure library. I/O procedures share
/// `files`; `argv` and `main&` expose `arguments`.
pub fn install(env: &Env, files: Rc<RefCell<FileTable>>, arguments: Rc<[String]>) {
    let plain: [(&'static str, Arity, NativeFn); 12] = [
        ("+", Arity::Exact(2), arith::add),
        ("-", Arity::Exact(2), arith::sub),
        ("*", Arity::Exact(2), arith::mul),
        ("=", Arity::Exact(2), arith::eq),
        (">", Arity::Exact(2), arith::gt),
        ("nil?", Arity::Exact(1), arith::is_nil),
        ("exit", Arity::Exact(1), arith::exit),
        ("foldr", Arity::Exact(2), combinators::foldr),
        ("pipe", Arity::AtLeast(1), combinators::pipe),
        ("cons", Arity::Exact(2), pairs::cons),
        ("car", Arity::Exact(1), pairs::car),
        ("cdr", Arity::Exact(1), pairs::cdr),
    ];

    for (name, arity, function) in plain {
        register(env, name, Expression::native(NativeProc::new(name, arity, function)));
    }

    let with_files: [(&'static str, Arity, NativeFn); 5] = [
        ("write", Arity::Exact(2), io::write),
        ("display", Arity::Exact(1), io::display),
        ("display-char", Arity::Exact(1), io::display_char),
        ("newline", Arity::Exact(0), io::newline),
        ("debug", Arity::Exact(1), io::debug),
    ];

    for (name, arity, function) in with_files {
        let native = NativeProc::new(name, arity, function)
            .with_payload(Payload::Files(files.clone()));

        register(env, name, Expression::native(native));
    }

    let with_arguments: [(&'static str, Arity, NativeFn); 2] = [
        ("argv", Arity::Exact(1), combinators::argv),
        ("main&", Arity::Exact(2), combinators::main_continuation),
    ];

    for (name, arity, function) in with_arguments {
        let native = NativeProc::new(name, arity, function)
            .with_payload(Payload::Arguments(arguments.clone()));

        register(env, name, Expression::native(native));
    }

    register(env, "true", TRUE);
    register(env, "false", FALSE);
}

pub(crate) fn int_arg(callee: &str, arg: &Expression) -> Result<i64, RuntimeFault> {
    match arg {
        Expression::Int(value) => Ok(*value),
        other => Err(RuntimeFault::type_mismatch(callee, "an int", other)),
    }
}
