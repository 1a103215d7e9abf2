//! Welcome banner display for chat sessions.

use console::style;

/// Print the welcome banner at the start of a chat session.
///
/// Shows who is speaking, the model, and the resolved voice ID when there is
/// one.
pub fn print_welcome_banner(name: &str, model: &str, backend: &str, voice_id: Option<&str>) {
    println!();
    println!("  {} {}", style("*").cyan().bold(), style(name).cyan().bold());
    println!();
    println!(
        "  {}  {} {}",
        style("Model:").bold(),
        style(model).dim(),
        style(format!("({backend})")).dim()
    );
    if let Some(voice_id) = voice_id {
        println!("  {}  {}", style("Voice:").bold(), style(voice_id).dim());
    }
    println!();
    println!("  {}", style("Type /help for commands, Ctrl+D to exit").dim());
    println!("  {}", style("---").dim());
    println!();
}
