mod cli;
mod repl;

use std::{cell::Cell, io::Write, path::{Path, PathBuf}, rc::Rc, time::Instant};

use clap::{CommandFactory, Parser};
use cli::{print_finished, print_parsing, print_running};
use lisp_core::{
    interpreter::prelude::{read_source, run_file, run_file_with, Config, Interpreter},
    parser::prelude::{parser_from_stream, ParserConfig, DEFAULT_MAX_LIST_LEN, DEFAULT_MAX_NAME_LEN},
    utils::prelude::{Error, Warning, WarningEmitterIO, PRE_PARSE_ERROR, RUNTIME_ERROR}
};

/// Deeply nested programs recurse once per level.
const INTERPRETER_STACK_SIZE: usize = 256 * 1024 * 1024;

/// Runs programs written in a small lexically scoped Lisp
#[derive(Parser)]
#[command(name = "lispi", version)]
struct Cli {
    /// Path of source file
    path: Option<PathBuf>,
    /// Arguments passed to the program, visible through `argv` and `main&`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
    /// Parse only and print every top-level form
    #[arg(long, default_value_t = false)]
    print_ast: bool,
    /// Start a read-eval-print loop, after running PATH if one is given
    #[arg(short, long, default_value_t = false)]
    interactive: bool,
    /// Longest accepted name
    #[arg(long, value_name = "CHARS", default_value_t = DEFAULT_MAX_NAME_LEN)]
    max_name_len: usize,
    /// Largest accepted number of list elements
    #[arg(long, value_name = "ITEMS", default_value_t = DEFAULT_MAX_LIST_LEN)]
    max_list_len: usize,
    /// Print status lines to stderr
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> Config {
        let argv = self.path.iter()
            .map(|path| path.display().to_string())
            .chain(self.args.iter().cloned())
            .collect();

        Config {
            parser: ParserConfig {
                max_name_len: self.max_name_len,
                max_list_len: self.max_list_len,
            },
            argv,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let code = if cli.path.is_none() && !cli.interactive {
        match Cli::command().print_help() {
            Ok(()) => 0,
            Err(err) => {
                eprintln!("failed to print usage: {err}");
                PRE_PARSE_ERROR
            }
        }
    } else {
        let interpreter = std::thread::Builder::new()
            .name("interpreter".into())
            .stack_size(INTERPRETER_STACK_SIZE)
            .spawn(move || run(cli));

        match interpreter {
            Ok(handle) => handle.join().unwrap_or(RUNTIME_ERROR),
            Err(err) => {
                eprintln!("failed to start interpreter: {err}");
                RUNTIME_ERROR
            }
        }
    };

    let _ = std::io::stdout().flush();
    std::process::exit(code);
}

fn run(cli: Cli) -> i32 {
    let config = cli.config();
    let warning_emitter = Rc::new(ConsoleWarningEmitter::default());
    let start = Instant::now();

    let result = match (&cli.path, cli.interactive) {
        (Some(path), _) if cli.print_ast => {
            if cli.verbose {
                print_parsing(&path.display().to_string());
            }

            print_ast(path, config.parser)
        },
        (Some(path), false) => {
            if cli.verbose {
                print_running(&path.display().to_string());
            }

            run_file(path, &config, warning_emitter.clone())
        },
        (Some(path), true) => {
            let interpreter = Interpreter::new(config.argv.clone());

            run_file_with(&interpreter, path, config.parser, warning_emitter.clone())
                .and_then(|_| repl::start(&interpreter, config.parser))
        },
        (None, _) => {
            let interpreter = Interpreter::new(config.argv.clone());

            repl::start(&interpreter, config.parser)
        }
    };

    let code = match result {
        Ok(()) => 0,
        Err(err) => {
            report(&err);
            err.exit_code()
        }
    };

    if cli.verbose {
        print_finished(start.elapsed(), code, warning_emitter.count());
    }

    code
}

fn print_ast(path: &Path, config: ParserConfig) -> Result<(), Error> {
    let src = read_source(path)?;

    for form in parser_from_stream(src.chars(), config) {
        match form {
            Ok((_, expression, _)) => println!("{expression}"),
            Err(error) => return Err(Error::Parse { path: path.to_path_buf(), src: src.clone(), error }),
        }
    }

    Ok(())
}

/// Writes the diagnostic for `err` to stderr. `exit` is not reported.
pub(crate) fn report(err: &Error) {
    if let Error::Exit { .. } = err {
        return;
    }

    let buf_writer = cli::stderr_buffer_writer();
    let mut buf = buf_writer.buffer();

    err.pretty(&mut buf);
    buf_writer
        .print(&buf)
        .expect("Writing error to stderr");
}

/// Prints warnings to stderr as they are raised.
#[derive(Debug, Default)]
pub struct ConsoleWarningEmitter {
    count: Cell<usize>,
}

impl ConsoleWarningEmitter {
    pub fn count(&self) -> usize {
        self.count.get()
    }
}

impl WarningEmitterIO for ConsoleWarningEmitter {
    fn emit_warning(&self, warning: Warning) {
        self.count.set(self.count.get() + 1);

        let buffer_writer = cli::stderr_buffer_writer();
        let mut buffer = buffer_writer.buffer();
        warning.pretty(&mut buffer);
        buffer_writer
            .print(&buffer)
            .expect("Writing warning to stderr");
    }
}
