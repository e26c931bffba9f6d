// ABOUTME: Version and prompt constants for the interpreter

pub const VERSION: &str = "1.0.0";

/// Interactive prompt for a fresh expression.
pub const PROMPT: &str = "> ";

/// Prompt shown while parentheses remain unbalanced.
pub const CONTINUE_PROMPT: &str = ". ";
