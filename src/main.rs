// ABOUTME: CLI driver: batch interpretation of files and stdin, plus the REPL

use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};
use schemer::config::{CONTINUE_PROMPT, PROMPT, VERSION};
use schemer::error::Error;
use schemer::eval::Interpreter;
use schemer::lexer;
use schemer::parser;
use schemer::printer::{show, PrintStyle};
use schemer::repl::{paren_depth, ReplHelper};
use schemer::value::Value;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;

/// Scheme-flavored interpreter with a mark-sweep heap
#[derive(Parser, Debug)]
#[command(name = "schemer")]
#[command(version = VERSION)]
#[command(about = "A Scheme-flavored interpreter with a mark-sweep heap")]
struct CliArgs {
    /// Script file to execute (reads stdin when omitted)
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,

    /// Print the token stream and exit
    #[arg(long)]
    tokens: bool,

    /// Print the parse tree and exit
    #[arg(long = "parse-only")]
    parse_only: bool,

    /// Report sweep statistics on stderr after each top-level form
    #[arg(long = "debug-gc")]
    debug_gc: bool,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let mut interp = Interpreter::new();
    interp.heap.debug = args.debug_gc;

    let source = match &args.script {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(source) => Some(source),
            Err(e) => {
                eprintln!("schemer: cannot read {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None if io::stdin().is_terminal() => None,
        None => {
            let mut source = String::new();
            match io::stdin().read_to_string(&mut source) {
                Ok(_) => Some(source),
                Err(e) => {
                    eprintln!("schemer: cannot read stdin: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
    };

    match source {
        Some(source) => match run_batch(&args, &mut interp, &source) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                println!("{}", err);
                ExitCode::FAILURE
            }
        },
        None => run_repl(&mut interp),
    }
}

/// Tokenize, parse, and interpret a whole source text.
fn run_batch(args: &CliArgs, interp: &mut Interpreter, source: &str) -> Result<(), Error> {
    let tokens = lexer::tokenize(source)?;
    if args.tokens {
        for token in &tokens {
            println!("{}", token);
        }
        return Ok(());
    }

    let program = parser::parse(&tokens, &mut interp.heap)?;
    if args.parse_only {
        let mut remaining = program;
        while let Value::Cons(form, rest) = interp.heap.get(remaining).clone() {
            println!("{}", show(&interp.heap, form, PrintStyle::Tree));
            remaining = rest;
        }
        return Ok(());
    }

    let mut stdout = io::stdout().lock();
    interp.run(program, &mut stdout)?;
    Ok(())
}

/// Interactive loop: prompt `> `, hold unbalanced input open under `. `,
/// then interpret. Errors are fatal, as in batch mode.
fn run_repl(interp: &mut Interpreter) -> ExitCode {
    let config = Config::builder().auto_add_history(true).build();
    let mut rl: Editor<ReplHelper, DefaultHistory> = match Editor::with_config(config) {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("schemer: failed to initialize REPL: {}", e);
            return ExitCode::FAILURE;
        }
    };
    rl.set_helper(Some(ReplHelper));
    let history_file = ".schemer_history";
    let _ = rl.load_history(history_file);

    let status = loop {
        let mut line = match rl.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("schemer: {}", e);
                break ExitCode::FAILURE;
            }
        };

        // Accumulate continuation lines until the parentheses balance.
        while matches!(paren_depth(&line), Some(depth) if depth > 0) {
            match rl.readline(CONTINUE_PROMPT) {
                Ok(more) => {
                    line.push('\n');
                    line.push_str(&more);
                }
                Err(ReadlineError::Interrupted) => {
                    line.clear();
                    break;
                }
                // Let the parser report the imbalance.
                Err(_) => break,
            }
        }

        if line.trim().is_empty() {
            continue;
        }
        if let Err(err) = interp_line(interp, &line) {
            println!("{}", err);
            break ExitCode::FAILURE;
        }
    };

    let _ = rl.save_history(history_file);
    status
}

fn interp_line(interp: &mut Interpreter, line: &str) -> Result<(), Error> {
    let tokens = lexer::tokenize(line)?;
    let program = parser::parse(&tokens, &mut interp.heap)?;
    let mut stdout = io::stdout().lock();
    interp.run(program, &mut stdout)?;
    Ok(())
}
