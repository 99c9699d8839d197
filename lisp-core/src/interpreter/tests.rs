use std::{path::PathBuf, rc::Rc};

use crate::{
    eval::prelude::RuntimeFault,
    parser::prelude::{ParseErrorType, ParserConfig},
    test_utils::capturing,
    utils::prelude::{
        Error, NullWarningEmitterIO, VectorWarningEmitterIO, Warning, PARSE_ERROR,
        PRE_PARSE_ERROR, RUNTIME_ERROR
    }
};

use super::{error::Warning as InterpreterWarning, prelude::{run_file, run_file_with, Config}};

fn run_source(src: &str) -> (Result<(), Error>, String) {
    let (interpreter, stdout, _) = capturing(&[]);

    let result = interpreter.run_source(
        PathBuf::from("test.lisp"),
        src,
        ParserConfig::default(),
        Rc::new(NullWarningEmitterIO)
    );

    (result, stdout.contents())
}

fn warnings_of(src: &str) -> Vec<InterpreterWarning> {
    let (interpreter, _, _) = capturing(&[]);
    let warnings = Rc::new(VectorWarningEmitterIO::new());

    interpreter.run_source(PathBuf::new(), src, ParserConfig::default(), warnings.clone())
        .expect("program should run");

    warnings.take()
        .into_iter()
        .map(|warning| match warning {
            Warning::Interpreter { warning, .. } => warning,
        })
        .collect()
}

#[test]
fn test_program_runs_in_order() {
    let (result, stdout) = run_source(r#"
        ; greet
        (define greet (lambda (c) (display-char c) (newline)))
        (greet 72)
        (greet 105) ; trailing comment
    "#);

    assert_eq!(result, Ok(()));
    assert_eq!(stdout, "H\ni\n");
}

#[test]
fn test_forms_before_parse_error_have_run() {
    let (result, stdout) = run_source("(display 1) (display 2) 3x");

    assert_eq!(stdout, "12");

    match result {
        Err(err @ Error::Parse { .. }) => {
            assert_eq!(err.exit_code(), PARSE_ERROR);
            if let Error::Parse { error, .. } = err {
                assert_eq!(error.error, ParseErrorType::DigitLedName);
            }
        },
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_stray_paren_after_comment() {
    let (result, _) = run_source("(display 1)\n; note\n)");

    match result {
        Err(Error::Parse { error, .. }) => assert_eq!(error.error, ParseErrorType::UnbalancedParen),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_unresolved_name_reports_form() {
    let (result, _) = run_source("(define a 1)\n(display missing-name)");

    let err = result.expect_err("name is unbound");
    assert_eq!(err.exit_code(), RUNTIME_ERROR);

    match &err {
        Error::Runtime { fault, span, .. } => {
            assert_eq!(fault, &RuntimeFault::UnresolvedName { name: "missing-name".into() });
            assert_eq!((span.start, span.end), (13, 35));
        },
        other => panic!("unexpected {other:?}"),
    }

    let pretty = err.pretty_string();
    assert!(pretty.contains("Runtime error"), "{pretty}");
    assert!(pretty.contains("missing-name"), "{pretty}");
    assert!(pretty.contains("test.lisp"), "{pretty}");
}

#[test]
fn test_exit_maps_to_status() {
    let (result, stdout) = run_source("(display 1) (exit 7) (display 2)");

    assert_eq!(result, Err(Error::Exit { code: 7 }));
    assert_eq!(result.unwrap_err().exit_code(), 7);
    assert_eq!(stdout, "1");
}

#[test]
fn test_invariant_fault_diagnostic() {
    let (result, _) = run_source("(+ 1 nil)");
    let pretty = result.expect_err("nil is not an int").pretty_string();

    assert!(pretty.contains("Native procedure fault"), "{pretty}");
}

#[test]
fn test_lambda_arity_is_program_error() {
    let (result, _) = run_source("((lambda (x) x))");
    let pretty = result.expect_err("x is missing").pretty_string();

    assert!(pretty.contains("Runtime error"), "{pretty}");
    assert!(!pretty.contains("Native procedure fault"), "{pretty}");
}

#[test]
fn test_unused_value_warning() {
    let warnings = warnings_of("(define a 1) (+ a 1) (display a) nil");

    assert_eq!(warnings.len(), 1);
    assert!(matches!(warnings[0], InterpreterWarning::UnusedValue { .. }));
}

#[test]
fn test_redefined_native_warning() {
    let warnings = warnings_of("(define + (lambda (a b) a)) (define mine 1) (define mine 2)");

    assert_eq!(warnings.len(), 1);
    match &warnings[0] {
        InterpreterWarning::RedefinedNative { name, location } => {
            assert_eq!(name, "+");
            assert_eq!((location.start, location.end), (0, 27));
        },
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_warning_renders_with_source() {
    let (interpreter, _, _) = capturing(&[]);
    let warnings = Rc::new(VectorWarningEmitterIO::new());

    interpreter.run_source(PathBuf::from("w.lisp"), "(* 2 3)", ParserConfig::default(), warnings.clone())
        .expect("program should run");

    let rendered = warnings.take()[0].pretty_string();

    assert!(rendered.contains("Unused value"), "{rendered}");
    assert!(rendered.contains("w.lisp"), "{rendered}");
}

#[test]
fn test_missing_file() {
    let config = Config::default();
    let path = std::env::temp_dir().join("lisp-core-missing-file.lisp");

    let err = run_file(&path, &config, Rc::new(NullWarningEmitterIO))
        .expect_err("file does not exist");

    assert!(matches!(err, Error::StdIo { .. }));
    assert_eq!(err.exit_code(), PRE_PARSE_ERROR);
}

#[test]
fn test_run_file() -> std::io::Result<()> {
    let path = std::env::temp_dir().join(format!("lisp-core-run-file-{}.lisp", std::process::id()));
    std::fs::write(&path, "(define x (quote cons 'ok'))\n(display-char (car x))\n")?;

    let (interpreter, stdout, _) = capturing(&[]);
    let result = run_file_with(&interpreter, &path, ParserConfig::default(), Rc::new(NullWarningEmitterIO));
    std::fs::remove_file(&path)?;

    assert_eq!(result, Ok(()));
    assert_eq!(stdout.contents(), "o");

    Ok(())
}
