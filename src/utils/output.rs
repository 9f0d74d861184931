//! Colored terminal output shared by both binaries.
//!
//! Colors are dropped when the target stream is not a terminal.

use owo_colors::{OwoColorize, Stream};

/// Print an error message (red) to stderr
pub fn error(message: &str) {
    eprintln!("{}", error_line(message));
}

/// Print a recovery hint to stderr
pub fn hint(message: &str) {
    eprintln!("{}", hint_line(message));
}

/// Print a success message (green)
pub fn success(message: &str) {
    println!("{}", success_line(message));
}

fn error_line(message: &str) -> String {
    format!(
        "{} {}",
        "❌".if_supports_color(Stream::Stderr, |t| t.red()),
        message.if_supports_color(Stream::Stderr, |t| t.red())
    )
}

fn hint_line(message: &str) -> String {
    format!(
        "{} {}",
        "💡".if_supports_color(Stream::Stderr, |t| t.yellow()),
        message.if_supports_color(Stream::Stderr, |t| t.yellow())
    )
}

fn success_line(message: &str) -> String {
    message
        .if_supports_color(Stream::Stdout, |t| t.green())
        .to_string()
}
