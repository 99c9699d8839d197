use std::{cell::RefCell, io::Write, rc::Rc};

use crate::{
    builtins::prelude::FileTable,
    environment::prelude::Expression,
    eval::prelude::RuntimeFault,
    interpreter::prelude::Interpreter,
    parser::prelude::parse_program,
};

/// Writer that keeps everything written to it for later inspection.
#[derive(Debug, Default, Clone)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).expect("output should be utf8")
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// An interpreter whose standard output and error are captured.
pub fn capturing(argv: &[&str]) -> (Interpreter, SharedBuffer, SharedBuffer) {
    let stdout = SharedBuffer::default();
    let stderr = SharedBuffer::default();

    let interpreter = Interpreter::with_files(
        FileTable::with_output(Box::new(stdout.clone()), Box::new(stderr.clone())),
        argv.iter().map(|arg| arg.to_string()).collect()
    );

    (interpreter, stdout, stderr)
}

/// Evaluates every form of `src` and returns the value of the last one.
pub fn eval_all(interpreter: &Interpreter, src: &str) -> Result<Expression, RuntimeFault> {
    let forms = parse_program(src).expect("test source should parse");
    let mut result = Expression::Null;

    for (_, form, _) in &forms {
        result = interpreter.eval(form)?;
    }

    Ok(result)
}

pub fn run(src: &str) -> Result<Expression, RuntimeFault> {
    let (interpreter, _, _) = capturing(&[]);
    eval_all(&interpreter, src)
}
