use crate::{
    environment::prelude::{Arity, Expression, NativeProc},
    eval::prelude::{apply, FaultClass, RuntimeFault},
    test_utils::{capturing, eval_all, run, SharedBuffer}
};

use super::prelude::{pair, Access, FileTable, FILE_TABLE_SIZE, STDIN, STDOUT};

#[test]
fn test_arithmetic() -> Result<(), RuntimeFault> {
    assert_eq!(run("(+ 2 3)")?, Expression::Int(5));
    assert_eq!(run("(- 2 3)")?, Expression::Int(-1));
    assert_eq!(run("(* 6 7)")?, Expression::Int(42));
    assert_eq!(run("(= 4 4)")?, Expression::Bool(true));
    assert_eq!(run("(> 4 5)")?, Expression::Bool(false));
    assert_eq!(run("(nil? nil)")?, Expression::Bool(true));
    assert_eq!(run("(nil? 0)")?, Expression::Bool(false));

    Ok(())
}

#[test]
fn test_arithmetic_faults() {
    let fault = run("(+ 1 nil)").expect_err("nil is not an int");
    assert_eq!(fault, RuntimeFault::TypeMismatch {
        callee: "+".into(),
        expected: "an int",
        found: "nil".into(),
    });
    assert_eq!(fault.class(), FaultClass::Invariant);

    assert_eq!(
        run("(+ 1)"),
        Err(RuntimeFault::ArityMismatch { callee: "+".into(), expected: Arity::Exact(2), got: 1 })
    );
}

#[test]
fn test_exit() {
    assert_eq!(run("(exit 4)"), Err(RuntimeFault::Exit { code: 4 }));
    assert_eq!(run("(exit nil)"), Err(RuntimeFault::Exit { code: 0 }));
    assert_eq!(run("(exit 255)"), Err(RuntimeFault::Exit { code: 255 }));
}

#[test]
fn test_exit_status_out_of_range() {
    for (src, status) in [("(exit 256)", "256"), ("(exit (- 0 1))", "-1")] {
        assert_eq!(
            run(src),
            Err(RuntimeFault::TypeMismatch {
                callee: "exit".into(),
                expected: "a status between 0 and 255",
                found: status.into(),
            })
        );
    }
}

#[test]
fn test_exit_stops_evaluation() {
    let (interpreter, stdout, _) = capturing(&[]);

    let result = eval_all(&interpreter, "(display 1) (exit 2) (display 3)");

    assert_eq!(result, Err(RuntimeFault::Exit { code: 2 }));
    assert_eq!(stdout.contents(), "1");
}

#[test]
fn test_foldr() -> Result<(), RuntimeFault> {
    assert_eq!(run("((foldr + 0) 1 2 3)")?, Expression::Int(6));
    assert_eq!(run("((foldr + 10))")?, Expression::Int(10));
    assert_eq!(run("((foldr - 0) 10 3)")?, Expression::Int(7));

    Ok(())
}

#[test]
fn test_foldr_cons_matches_hand_built() -> Result<(), RuntimeFault> {
    let (interpreter, stdout, _) = capturing(&[]);

    eval_all(&interpreter, r#"
        (define show (lambda (p) (display (car p)) (display (car (cdr p))) (display (cdr (cdr p)))))
        (show ((foldr cons nil) 1 2))
        (show (cons 1 (cons 2 nil)))
    "#)?;

    assert_eq!(stdout.contents(), "12nil12nil");

    Ok(())
}

#[test]
fn test_pipe() -> Result<(), RuntimeFault> {
    assert_eq!(
        run("((pipe + (lambda (x) (* x 10)) (lambda (x) (- x 1))) 2 3)")?,
        Expression::Int(49)
    );
    assert_eq!(run("((pipe +) 2 3)")?, Expression::Int(5));
    assert!(matches!(run("(pipe)"), Err(RuntimeFault::ArityMismatch { .. })));

    Ok(())
}

#[test]
fn test_pair_application() -> Result<(), RuntimeFault> {
    assert_eq!(run("((cons 3 4) -)")?, Expression::Int(-1));
    assert_eq!(run("((cons 3 4) (lambda (a b) b))")?, Expression::Int(4));

    let fault = run("(car 1)").expect_err("1 is not a pair");
    assert_eq!(fault.class(), FaultClass::Invariant);

    let built = pair(Expression::Int(1), Expression::Null);
    let second = apply(&built, vec![run("(lambda (a b) b)")?])?;
    assert_eq!(second, Expression::Null);

    Ok(())
}

#[test]
fn test_argv() -> Result<(), RuntimeFault> {
    let (interpreter, stdout, _) = capturing(&["prog", "hi"]);

    eval_all(&interpreter, r#"
        (define print-string (lambda (s)
            (cond ((nil? s) nil)
                  (else ((lambda () (display-char (car s)) (print-string (cdr s))))))))
        (define print-all (lambda (v)
            (cond ((nil? v) nil)
                  (else ((lambda () (print-string (car v)) (newline) (print-all (cdr v))))))))
        (print-all (argv cons))
    "#)?;

    assert_eq!(stdout.contents(), "prog\nhi\n");

    Ok(())
}

#[test]
fn test_argv_with_counting_join() -> Result<(), RuntimeFault> {
    let (interpreter, _, _) = capturing(&["abc", "de"]);

    // `head` is ignored, so only the length of the outer chain survives
    let count = eval_all(&interpreter, r#"
        (argv (lambda (head tail) (cond ((nil? tail) 1) (else (+ tail 1)))))
    "#)?;

    assert_eq!(count, Expression::Int(2));

    Ok(())
}

#[test]
fn test_main_continuation() -> Result<(), RuntimeFault> {
    let (interpreter, _, _) = capturing(&["a", "b", "c"]);

    let result = eval_all(&interpreter, "(main& cons (lambda (argc argv) (+ argc (car (car argv)))))")?;

    assert_eq!(result, Expression::Int(3 + 97));

    Ok(())
}

#[test]
fn test_output_procedures() -> Result<(), RuntimeFault> {
    let (interpreter, stdout, stderr) = capturing(&[]);

    eval_all(&interpreter, r#"
        (display 12)
        (newline)
        (display true)
        (display-char 33)
        (newline)
        (debug 5)
        (debug nil)
        (write 2 69)
    "#)?;

    assert_eq!(stdout.contents(), "12\ntrue!\nInt(5)\nNull\n");
    assert_eq!(stderr.contents(), "E");

    Ok(())
}

#[test]
fn test_write_faults() {
    assert_eq!(run("(write 7 65)"), Err(RuntimeFault::BadDescriptor { fd: 7 }));
    assert_eq!(run("(write (- 0 1) 65)"), Err(RuntimeFault::BadDescriptor { fd: -1 }));
    assert_eq!(run("(write 100 65)"), Err(RuntimeFault::BadDescriptor { fd: 100 }));
    assert_eq!(run("(write 0 65)"), Err(RuntimeFault::NotWritable { fd: 0 }));
    assert_eq!(
        run("(write 1 55296)"),
        Err(RuntimeFault::InvalidCharCode { code: 55296 })
    );
}

#[test]
fn test_file_table() -> Result<(), RuntimeFault> {
    let mut table = FileTable::with_output(Box::new(std::io::sink()), Box::new(std::io::sink()));
    let extra = SharedBuffer::default();

    assert_eq!(table.access(STDIN), Some(Access::Read));
    assert_eq!(table.access(STDOUT), Some(Access::Write));
    assert_eq!(table.access(FILE_TABLE_SIZE), None);

    let fd = table.open(Box::new(extra.clone())).expect("a slot should be free");
    assert_eq!(fd, 3);

    table.write_char(fd as i64, 0x3bb)?;
    assert_eq!(extra.contents(), "λ");

    for _ in 4..FILE_TABLE_SIZE {
        assert!(table.open(Box::new(std::io::sink())).is_some());
    }
    assert!(table.open(Box::new(std::io::sink())).is_none());

    Ok(())
}

fn leak_list(_args: &[Expression], _this: &NativeProc) -> Result<Expression, RuntimeFault> {
    Ok(Expression::List(vec![Expression::Int(1)]))
}

#[test]
fn test_native_returning_list_is_rejected() {
    let native = Expression::native(NativeProc::new("leaky", Arity::Exact(0), leak_list));

    let fault = apply(&native, vec![]).expect_err("raw lists must not escape");

    assert_eq!(fault, RuntimeFault::RawListResult { callee: "leaky".into() });
    assert_eq!(fault.class(), FaultClass::Invariant);
}
