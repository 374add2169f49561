/// Dashboard views and form helpers
///
/// Each view is an independent fetch-render round trip: it pulls fresh
/// state from the API, renders it, and applies mutations through forms.
/// After any successful mutation the view reloads before the next paint;
/// nothing is cached across round trips.
///
/// Rendering is pure (`&[data] -> String`) so tables, charts, and the
/// empty-state branches are unit-testable without I/O; the interactive
/// wrappers own stdin/stdout.
///
/// # Views
///
/// - `overview`: aggregate counts and the status chart
/// - `projects`: project list with create/delete forms
/// - `tasks`: task table, per-task detail, create/delete forms

pub mod overview;
pub mod projects;
pub mod tasks;

use std::io::{self, BufRead, Write};

/// Reads one line from stdin after printing a prompt
///
/// Returns None on EOF so callers can treat a closed stdin as "go back".
pub fn read_line(prompt: &str) -> io::Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    let bytes = io::stdin().lock().read_line(&mut line)?;
    if bytes == 0 {
        return Ok(None);
    }

    Ok(Some(line.trim().to_string()))
}

/// Prompts with a retained default value
///
/// An empty answer keeps the default, so failed form submissions can be
/// corrected and retried without retyping every field.
pub(crate) fn prompt_with_default(label: &str, default: &str) -> io::Result<Option<String>> {
    let prompt = if default.is_empty() {
        format!("{}: ", label)
    } else {
        format!("{} [{}]: ", label, default)
    };

    match read_line(&prompt)? {
        None => Ok(None),
        Some(answer) if answer.is_empty() => Ok(Some(default.to_string())),
        Some(answer) => Ok(Some(answer)),
    }
}

/// Renders a failure inline, naming the failed operation
///
/// Errors never crash a view; they are shown at the point of the failed
/// action and the user decides what to do next.
pub(crate) fn print_error(operation: &str, err: &dyn std::fmt::Display) {
    println!("✗ Failed to {}: {}", operation, err);
}

/// Asks whether to retry a failed form submission
pub(crate) fn confirm_retry() -> io::Result<bool> {
    match read_line("Retry with the same values? [y/N]: ")? {
        Some(answer) => Ok(answer.eq_ignore_ascii_case("y")),
        None => Ok(false),
    }
}
