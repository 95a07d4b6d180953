//! Output formatting helpers.

use colored::Colorize;

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print an HTTP status line to stderr, colored by class.
pub fn status(code: u16) {
    let text = format!("HTTP {}", code);
    let text = match code {
        200..=299 => text.green(),
        400..=499 => text.yellow(),
        _ => text.red(),
    };
    eprintln!("{}", text);
}
