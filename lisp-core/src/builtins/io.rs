use std::io::Write;

use crate::{
    environment::prelude::{Expression, NativeProc, Payload},
    eval::prelude::RuntimeFault
};

use super::int_arg;

pub const FILE_TABLE_SIZE: usize = 8;

pub const STDIN: usize = 0;
pub const STDOUT: usize = 1;
pub const STDERR: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

struct FileEntry {
    access: Access,
    sink: Option<Box<dyn Write>>,
}

/// Fixed-size descriptor table shared by the I/O procedures.
pub struct FileTable {
    entries: [Option<FileEntry>; FILE_TABLE_SIZE],
}

impl FileTable {
    pub fn empty() -> Self {
        Self {
            entries: std::array::from_fn(|_| None),
        }
    }

    /// Standard input, output and error in slots 0, 1 and 2.
    pub fn standard() -> Self {
        Self::with_output(Box::new(std::io::stdout()), Box::new(std::io::stderr()))
    }

    pub fn with_output(stdout: Box<dyn Write>, stderr: Box<dyn Write>) -> Self {
        let mut table = Self::empty();
        table.entries[STDIN] = Some(FileEntry { access: Access::Read, sink: None });
        table.entries[STDOUT] = Some(FileEntry { access: Access::Write, sink: Some(stdout) });
        table.entries[STDERR] = Some(FileEntry { access: Access::Write, sink: Some(stderr) });
        table
    }

    /// Puts a writer into the first free slot and returns its descriptor.
    pub fn open(&mut self, sink: Box<dyn Write>) -> Option<usize> {
        let fd = self.entries.iter().position(Option::is_none)?;
        self.entries[fd] = Some(FileEntry { access: Access::Write, sink: Some(sink) });
        Some(fd)
    }

    pub fn access(&self, fd: usize) -> Option<Access> {
        self.entries.get(fd)?.as_ref().map(|entry| entry.access)
    }

    pub fn write_bytes(&mut self, fd: i64, bytes: &[u8]) -> Result<(), RuntimeFault> {
        let entry = usize::try_from(fd).ok()
            .and_then(|index| self.entries.get_mut(index))
            .and_then(Option::as_mut)
            .ok_or(RuntimeFault::BadDescriptor { fd })?;

        match (entry.access, entry.sink.as_mut()) {
            (Access::Write, Some(sink)) => {
                sink.write_all(bytes)?;
                Ok(())
            },
            _ => Err(RuntimeFault::NotWritable { fd }),
        }
    }

    pub fn write_char(&mut self, fd: i64, code: i64) -> Result<(), RuntimeFault> {
        let ch = u32::try_from(code).ok()
            .and_then(char::from_u32)
            .ok_or(RuntimeFault::InvalidCharCode { code })?;

        let mut buf = [0; 4];
        self.write_bytes(fd, ch.encode_utf8(&mut buf).as_bytes())
    }

    pub fn flush(&mut self) -> Result<(), RuntimeFault> {
        for sink in self.entries.iter_mut().flatten().filter_map(|entry| entry.sink.as_mut()) {
            sink.flush()?;
        }

        Ok(())
    }
}

fn with_files<R>(
    this: &NativeProc,
    f: impl FnOnce(&mut FileTable) -> Result<R, RuntimeFault>
) -> Result<R, RuntimeFault> {
    match &this.payload {
        Some(Payload::Files(files)) => f(&mut files.borrow_mut()),
        _ => Err(RuntimeFault::type_mismatch(this.name, "a file table", &Expression::Null)),
    }
}

/// `(write fd code)`
pub fn write(args: &[Expression], this: &NativeProc) -> Result<Expression, RuntimeFault> {
    let fd = int_arg(this.name, &args[0])?;
    let code = int_arg(this.name, &args[1])?;

    with_files(this, |files| files.write_char(fd, code))?;

    Ok(Expression::Null)
}

pub fn display(args: &[Expression], this: &NativeProc) -> Result<Expression, RuntimeFault> {
    let text = args[0].to_string();

    with_files(this, |files| files.write_bytes(STDOUT as i64, text.as_bytes()))?;

    Ok(Expression::Null)
}

pub fn display_char(args: &[Expression], this: &NativeProc) -> Result<Expression, RuntimeFault> {
    let code = int_arg(this.name, &args[0])?;

    with_files(this, |files| files.write_char(STDOUT as i64, code))?;

    Ok(Expression::Null)
}

pub fn newline(_args: &[Expression], this: &NativeProc) -> Result<Expression, RuntimeFault> {
    with_files(this, |files| files.write_bytes(STDOUT as i64, b"\n"))?;

    Ok(Expression::Null)
}

pub fn debug(args: &[Expression], this: &NativeProc) -> Result<Expression, RuntimeFault> {
    let text = format!("{:?}\n", args[0]);

    with_files(this, |files| files.write_bytes(STDOUT as i64, text.as_bytes()))?;

    Ok(Expression::Null)
}
