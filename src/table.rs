/// Jingle variant table
///
/// Static lookup of which jingle variant (primary or alternate) a skill
/// plays at each level, loaded once from a CSV resource and immutable
/// thereafter. The CSV is a header row followed by one row per skill:
/// skill name, then 99 `"1"`/`"0"` cells in level order.
///
/// Rows are keyed by the skill-name column and validated against the
/// enum, so a reordered file still loads correctly and a misspelled or
/// missing skill fails the load instead of silently misaligning.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::TableError;
use crate::skill::Skill;

/// Highest trainable level
pub const MAX_LEVEL: u8 = 99;

/// Immutable (skill, level) -> variant flag lookup
#[derive(Debug)]
pub struct JingleVariantTable {
    // indexed [skill ordinal][level - 1]
    flags: [[bool; MAX_LEVEL as usize]; Skill::COUNT],
}

impl JingleVariantTable {
    /// Load and validate the variant table from a CSV reader
    pub fn load<R: BufRead>(reader: R) -> Result<Self, TableError> {
        let mut lines = reader.lines();

        // header row carries no data but must be present
        match lines.next() {
            Some(Ok(_)) => {}
            Some(Err(e)) => return Err(TableError::Io(e)),
            None => return Err(TableError::MissingHeader),
        }

        let mut flags = [[false; MAX_LEVEL as usize]; Skill::COUNT];
        let mut seen = [false; Skill::COUNT];

        for line in lines {
            let line = line.map_err(TableError::Io)?;
            if line.trim().is_empty() {
                continue;
            }

            let mut cells = line.split(',');
            let name = cells.next().unwrap_or("").trim();
            let skill =
                Skill::from_name(name).ok_or_else(|| TableError::UnknownSkill(name.to_string()))?;

            if seen[skill.ordinal()] {
                return Err(TableError::DuplicateSkill(skill.name().to_string()));
            }
            seen[skill.ordinal()] = true;

            let row = &mut flags[skill.ordinal()];
            let mut level = 0usize;
            for cell in cells {
                if level >= MAX_LEVEL as usize {
                    level += 1; // keep counting for the error message
                    continue;
                }
                match cell.trim() {
                    "1" => row[level] = true,
                    "0" => row[level] = false,
                    other => {
                        return Err(TableError::InvalidFlag {
                            skill: skill.name().to_string(),
                            level: (level + 1) as u8,
                            value: other.to_string(),
                        })
                    }
                }
                level += 1;
            }
            if level != MAX_LEVEL as usize {
                return Err(TableError::WrongColumnCount {
                    skill: skill.name().to_string(),
                    found: level,
                });
            }
        }

        for skill in Skill::ALL {
            if !seen[skill.ordinal()] {
                return Err(TableError::MissingSkill(skill.name().to_string()));
            }
        }

        tracing::info!(
            "Loaded jingle variant table: {} skills x {} levels",
            Skill::COUNT,
            MAX_LEVEL
        );
        Ok(Self { flags })
    }

    /// Load the variant table from a file on disk
    pub fn load_from_path(path: &Path) -> Result<Self, TableError> {
        let file = File::open(path).map_err(TableError::Io)?;
        Self::load(BufReader::new(file))
    }

    /// Whether `skill` plays its alternate jingle at `level`
    ///
    /// Pure lookup, total over levels 1..=99. A level outside that range
    /// is a caller contract violation and panics.
    pub fn variant_for(&self, skill: Skill, level: u8) -> bool {
        assert!(
            (1..=MAX_LEVEL).contains(&level),
            "level {} outside 1..={} for {}",
            level,
            MAX_LEVEL,
            skill
        );
        self.flags[skill.ordinal()][(level - 1) as usize]
    }
}
