//! Interactive character and guidance prompts.

use console::style;
use dialoguer::Input;

use persona_core::character::{Selection, resolve_menu_choice};
use persona_types::character::Character;

/// Print the numbered character list.
pub fn print_character_menu() {
    println!();
    println!("  {}", style("Choose a character:").bold());
    println!();
    for (i, character) in Character::ALL.iter().enumerate() {
        println!(
            "  [{}] {}",
            style(i + 1).cyan(),
            style(character.display_name()).bold()
        );
    }
    println!();
}

/// Show the menu and read a choice. Invalid input selects the first
/// character.
pub fn pick_character() -> anyhow::Result<Character> {
    print_character_menu();

    let choice: String = Input::new()
        .with_prompt("  Character (number)")
        .allow_empty(true)
        .interact_text()?;

    let selection = resolve_menu_choice(&choice);
    if let Selection::Defaulted(character) = selection {
        println!(
            "  {} Invalid choice. Defaulting to {}.",
            style("!").yellow().bold(),
            style(character.display_name()).cyan()
        );
    }
    Ok(selection.character())
}

/// Ask for optional guidance. Enter skips.
pub fn prompt_guidance() -> anyhow::Result<String> {
    let guidance: String = Input::new()
        .with_prompt("  Custom guidance (Enter to skip)")
        .allow_empty(true)
        .interact_text()?;
    Ok(guidance.trim().to_string())
}
