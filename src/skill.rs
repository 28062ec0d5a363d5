/// Skill identifiers
///
/// The fixed set of trainable skills, in the client's enumeration order.
/// Ordinals are stable for the process lifetime and index every per-skill
/// table in the crate.
use std::fmt;

/// A trainable skill
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Skill {
    Attack,
    Defence,
    Strength,
    Hitpoints,
    Ranged,
    Prayer,
    Magic,
    Cooking,
    Woodcutting,
    Fletching,
    Fishing,
    Firemaking,
    Crafting,
    Smithing,
    Mining,
    Herblore,
    Agility,
    Thieving,
    Slayer,
    Farming,
    Runecraft,
    Hunter,
    Construction,
}

impl Skill {
    /// Number of skills
    pub const COUNT: usize = 23;

    /// All skills in enumeration order
    pub const ALL: [Skill; Skill::COUNT] = [
        Skill::Attack,
        Skill::Defence,
        Skill::Strength,
        Skill::Hitpoints,
        Skill::Ranged,
        Skill::Prayer,
        Skill::Magic,
        Skill::Cooking,
        Skill::Woodcutting,
        Skill::Fletching,
        Skill::Fishing,
        Skill::Firemaking,
        Skill::Crafting,
        Skill::Smithing,
        Skill::Mining,
        Skill::Herblore,
        Skill::Agility,
        Skill::Thieving,
        Skill::Slayer,
        Skill::Farming,
        Skill::Runecraft,
        Skill::Hunter,
        Skill::Construction,
    ];

    /// Display name as the client spells it
    pub fn name(&self) -> &'static str {
        match self {
            Skill::Attack => "Attack",
            Skill::Defence => "Defence",
            Skill::Strength => "Strength",
            Skill::Hitpoints => "Hitpoints",
            Skill::Ranged => "Ranged",
            Skill::Prayer => "Prayer",
            Skill::Magic => "Magic",
            Skill::Cooking => "Cooking",
            Skill::Woodcutting => "Woodcutting",
            Skill::Fletching => "Fletching",
            Skill::Fishing => "Fishing",
            Skill::Firemaking => "Firemaking",
            Skill::Crafting => "Crafting",
            Skill::Smithing => "Smithing",
            Skill::Mining => "Mining",
            Skill::Herblore => "Herblore",
            Skill::Agility => "Agility",
            Skill::Thieving => "Thieving",
            Skill::Slayer => "Slayer",
            Skill::Farming => "Farming",
            Skill::Runecraft => "Runecraft",
            Skill::Hunter => "Hunter",
            Skill::Construction => "Construction",
        }
    }

    /// Parse a skill from its name, case-insensitively
    ///
    /// Used to key variant-table rows by their skill-name column.
    pub fn from_name(name: &str) -> Option<Skill> {
        let name = name.trim();
        Skill::ALL
            .iter()
            .copied()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }

    /// Stable ordinal in enumeration order
    pub fn ordinal(&self) -> usize {
        *self as usize
    }

    /// Resource name of this skill's jingle
    ///
    /// `<skill>.ogg` for the primary jingle, `<skill>2.ogg` for the
    /// alternate.
    pub fn resource_name(&self, alternate: bool) -> String {
        if alternate {
            format!("{}2.ogg", self.name().to_lowercase())
        } else {
            format!("{}.ogg", self.name().to_lowercase())
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
