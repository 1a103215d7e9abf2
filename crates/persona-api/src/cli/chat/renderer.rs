//! Terminal output for streamed responses.
//!
//! Tokens are printed raw as they arrive; a dim stats line follows each
//! response.

use std::io::Write;
use std::time::Duration;

use console::style;

use persona_types::llm::Usage;

/// Print a single streaming token (raw, no formatting).
pub fn print_streaming_token(token: &str) {
    print!("{token}");
    let _ = std::io::stdout().flush();
}

/// Print the speaker label that precedes a response.
pub fn print_speaker(name: &str) {
    print!("\n  {} ", style(name).cyan().bold());
    let _ = std::io::stdout().flush();
}

/// Format the stats footer shown after a response.
///
/// Format: "| {tokens} tokens · {time}s · {model}". The token count is
/// omitted when the backend reported no usage.
pub fn format_stats_footer(usage: Option<&Usage>, elapsed: Duration, model: &str) -> String {
    let dot = style("\u{00b7}").dim();
    let seconds = style(format!("{:.1}s", elapsed.as_secs_f64())).dim();
    match usage {
        Some(usage) => format!(
            "  {} {} tokens {dot} {seconds} {dot} {}",
            style("|").dim(),
            style(usage.output_tokens).dim(),
            style(model).dim(),
        ),
        None => format!(
            "  {} {seconds} {dot} {}",
            style("|").dim(),
            style(model).dim(),
        ),
    }
}

/// Print the stats footer after a response.
pub fn print_stats_footer(usage: Option<&Usage>, elapsed: Duration, model: &str) {
    println!();
    println!("{}", format_stats_footer(usage, elapsed, model));
}
