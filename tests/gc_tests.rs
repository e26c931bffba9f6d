// ABOUTME: Observability tests for the between-forms mark-sweep reclamation

use schemer::eval::Interpreter;
use schemer::heap::{FALSE, NULL, TRUE, VOID};
use schemer::lexer::tokenize;
use schemer::parser::parse;
use schemer::value::Value;

fn run(interp: &mut Interpreter, source: &str) -> String {
    let tokens = tokenize(source).expect("test source lexes");
    let program = parse(&tokens, &mut interp.heap).expect("test source parses");
    let mut out = Vec::new();
    interp.run(program, &mut out).expect("test source evaluates");
    String::from_utf8(out).expect("utf-8 output")
}

#[test]
fn test_intermediate_values_are_freed_between_forms() {
    let mut interp = Interpreter::new();
    run(&mut interp, "(+ 1 2 3)");
    // The form's input tree and the argument values are garbage afterwards.
    assert!(interp.heap.last_sweep().freed_values > 0);
}

#[test]
fn test_values_reachable_from_globals_survive() {
    let mut interp = Interpreter::new();
    let output = run(
        &mut interp,
        "(define lst (list 1 2 3))
         (+ 1 1)
         (car lst)
         (cdr lst)",
    );
    assert_eq!(output, "2\n1\n(2 3)\n");
}

#[test]
fn test_closures_bound_globally_survive_collection() {
    let mut interp = Interpreter::new();
    let output = run(
        &mut interp,
        "(define (add n) (lambda (x) (+ x n)))
         (define add3 (add 3))
         1 2 3
         (add3 4)",
    );
    assert_eq!(output, "1\n2\n3\n7\n");
}

#[test]
fn test_heap_reaches_a_steady_state() {
    // Identical programs leave identical live sets, however many throwaway
    // forms ran in between.
    let mut small = Interpreter::new();
    run(&mut small, "(+ 1 2)");
    let mut large = Interpreter::new();
    run(&mut large, "(+ 1 2) (+ 1 2) (+ 1 2) (+ 1 2) (+ 1 2)");
    assert_eq!(small.heap.live_values(), large.heap.live_values());
    assert_eq!(small.heap.live_frames(), large.heap.live_frames());
}

#[test]
fn test_abandoned_closure_and_frames_are_collected() {
    let mut interp = Interpreter::new();
    run(&mut interp, "(let ((f (lambda (x) x))) (f 1))");
    let stats = interp.heap.last_sweep();
    // The let frame, the application frame, and the closure are gone.
    assert!(stats.freed_frames >= 2);
    assert!(stats.freed_values > 0);
}

#[test]
fn test_letrec_cycle_is_collected_once_abandoned() {
    // The closure captures the frame that binds the closure: a true cycle,
    // unreachable after the form completes.
    let mut interp = Interpreter::new();
    run(&mut interp, "(letrec ((loop (lambda (n) n))) (loop 1))");
    let before = interp.heap.live_values();
    run(&mut interp, "(+ 1 1)");
    assert!(interp.heap.live_values() <= before);
    assert!(interp.heap.last_sweep().freed_values > 0);
}

#[test]
fn test_singletons_are_permanent() {
    let mut interp = Interpreter::new();
    run(&mut interp, "1 2 3");
    assert!(matches!(interp.heap.get(NULL), Value::Null));
    assert!(matches!(interp.heap.get(VOID), Value::Void));
    assert!(matches!(interp.heap.get(TRUE), Value::Bool(true)));
    assert!(matches!(interp.heap.get(FALSE), Value::Bool(false)));
}

#[test]
fn test_evaluation_still_correct_after_many_sweeps() {
    let mut interp = Interpreter::new();
    run(
        &mut interp,
        "(define (fib n) (if (<= n 1) n (+ (fib (- n 1)) (fib (- n 2)))))",
    );
    for _ in 0..10 {
        assert_eq!(run(&mut interp, "(fib 10)"), "55\n");
    }
}
