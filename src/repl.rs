// ABOUTME: Rustyline helper and the paren-balance check driving continuation prompts

use rustyline::completion::Completer;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::Helper;

pub struct ReplHelper;

// The required rustyline traits, all on their default behavior.
impl Helper for ReplHelper {}

impl Completer for ReplHelper {
    type Candidate = String;
}

impl Hinter for ReplHelper {
    type Hint = String;
}

impl Validator for ReplHelper {}

impl Highlighter for ReplHelper {}

/// Depth of unclosed parentheses, ignoring parens inside strings and
/// comments. None once the input is overclosed. An unterminated string also
/// holds the line open, since strings may span newlines.
pub fn paren_depth(input: &str) -> Option<i32> {
    let mut depth = 0;
    let mut in_string = false;
    let mut escaped = false;
    let mut in_comment = false;
    for c in input.chars() {
        if in_comment {
            if c == '\n' {
                in_comment = false;
            }
            continue;
        }
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            '"' => in_string = true,
            ';' => in_comment = true,
            _ => {}
        }
        if depth < 0 {
            return None;
        }
    }
    if in_string {
        return Some(depth + 1);
    }
    Some(depth)
}
