//! Supported character personas.
//!
//! The set is fixed and ordered: menu numbering, the default selection, and
//! `Character::ALL` all follow declaration order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named persona the agent can speak as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Character {
    #[default]
    #[serde(rename = "George_Carlin")]
    GeorgeCarlin,
    #[serde(rename = "Max_Payne")]
    MaxPayne,
    #[serde(rename = "Obi_Wan_Kenobi")]
    ObiWanKenobi,
    #[serde(rename = "David_Goggins")]
    DavidGoggins,
    #[serde(rename = "Duke_Nukem")]
    DukeNukem,
    #[serde(rename = "Scary_Terry")]
    ScaryTerry,
    #[serde(rename = "Sterling_Archer")]
    SterlingArcher,
    #[serde(rename = "Rick_Sanchez")]
    RickSanchez,
}

impl Character {
    /// Every supported character, in menu order. The first entry is the default.
    pub const ALL: [Character; 8] = [
        Character::GeorgeCarlin,
        Character::MaxPayne,
        Character::ObiWanKenobi,
        Character::DavidGoggins,
        Character::DukeNukem,
        Character::ScaryTerry,
        Character::SterlingArcher,
        Character::RickSanchez,
    ];

    /// Canonical identifier (e.g. `George_Carlin`).
    pub fn name(&self) -> &'static str {
        match self {
            Character::GeorgeCarlin => "George_Carlin",
            Character::MaxPayne => "Max_Payne",
            Character::ObiWanKenobi => "Obi_Wan_Kenobi",
            Character::DavidGoggins => "David_Goggins",
            Character::DukeNukem => "Duke_Nukem",
            Character::ScaryTerry => "Scary_Terry",
            Character::SterlingArcher => "Sterling_Archer",
            Character::RickSanchez => "Rick_Sanchez",
        }
    }

    /// Human-friendly label for menus and banners.
    pub fn display_name(&self) -> String {
        self.name().replace('_', " ")
    }

    /// File name of the character's prompt inside the prompts directory.
    pub fn prompt_file_name(&self) -> String {
        format!("{}.txt", self.name().replace(' ', "_"))
    }

    /// Name this character is registered under in the voice directory.
    pub fn directory_name(&self) -> &'static str {
        self.name()
    }

    /// Voice identifier registered for this character at the time of writing.
    ///
    /// Directory contents can change; prefer a runtime lookup and use this
    /// only as a reference value.
    pub fn known_voice_id(&self) -> &'static str {
        match self {
            Character::GeorgeCarlin => "WUskcuzAbpFeh46oYy0B",
            Character::MaxPayne => "vosASqmKV6UsA6rHMkqP",
            Character::ObiWanKenobi => "Yj8J8mqj4zaLvpq7MLEt",
            Character::DavidGoggins => "Z3lN8xrIGAbOXleAdIeQ",
            Character::DukeNukem => "Q3V0aigkBauXSZTYJsmr",
            Character::ScaryTerry => "yAZetOJ1I6kTvOehOOGp",
            Character::SterlingArcher => "J2tWojuB5wEBXrVezwXm",
            Character::RickSanchez => "q7gnMYP8uD2QRVYhvQzt",
        }
    }

    /// Parse a 1-based menu choice. Returns `None` for non-numeric or
    /// out-of-range input.
    pub fn from_menu_choice(input: &str) -> Option<Self> {
        let index: usize = input.trim().parse().ok()?;
        index
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Character {
    type Err = String;

    /// Accepts the canonical identifier or the spaced display name,
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace(' ', "_").to_lowercase();
        Self::ALL
            .iter()
            .find(|c| c.name().to_lowercase() == normalized)
            .copied()
            .ok_or_else(|| format!("unknown character: '{s}'"))
    }
}
