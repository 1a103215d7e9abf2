//! Character menu selection.

use tracing::debug;

use persona_types::character::Character;

/// Outcome of resolving a menu choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// The input named a valid entry.
    Chosen(Character),
    /// The input was invalid; the first character was substituted.
    Defaulted(Character),
}

impl Selection {
    pub fn character(&self) -> Character {
        match self {
            Selection::Chosen(c) | Selection::Defaulted(c) => *c,
        }
    }
}

/// Resolve a 1-based menu choice, falling back to the first character on
/// non-numeric or out-of-range input.
pub fn resolve_menu_choice(input: &str) -> Selection {
    match Character::from_menu_choice(input) {
        Some(character) => Selection::Chosen(character),
        None => {
            let fallback = Character::ALL[0];
            debug!(input = %input.trim(), default = %fallback, "Invalid character choice, using default");
            Selection::Defaulted(fallback)
        }
    }
}
