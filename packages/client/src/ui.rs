//! Terminal helpers.

use std::io::Write;

pub const PROMPT: &str = "> ";

/// Print a server line, then redisplay the prompt
pub fn print_line(line: &str) {
    println!("\r{}", line);
    print!("{}", PROMPT);
    std::io::stdout().flush().ok();
}
