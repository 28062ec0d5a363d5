/// Skill level tracker
///
/// Holds the last-observed level for every skill and detects deltas on
/// each polling tick. The first observation seeds the baseline without
/// reporting anything, so stale or zeroed startup state never fires
/// spurious jingles.
use crate::skill::Skill;

/// Per-skill baseline levels with cold-start seeding
pub struct SkillLevelTracker {
    baseline: [u8; Skill::COUNT],
    seeded: bool,
}

impl SkillLevelTracker {
    pub fn new() -> Self {
        Self {
            baseline: [0; Skill::COUNT],
            seeded: false,
        }
    }

    /// Whether the baseline has been seeded by a first observation
    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    /// Compare freshly sampled levels against the baseline.
    ///
    /// The first call seeds the baseline and reports no changes. Later
    /// calls update the baseline and return every skill whose level
    /// differs, with its new level, in enumeration order. Levels only
    /// increase in practice, but a decrease is reported the same way
    /// rather than treated specially.
    pub fn observe(&mut self, levels: &[u8; Skill::COUNT]) -> Vec<(Skill, u8)> {
        if !self.seeded {
            self.baseline = *levels;
            self.seeded = true;
            tracing::debug!("Seeded skill level baseline");
            return Vec::new();
        }

        let mut changed = Vec::new();
        for skill in Skill::ALL {
            let sampled = levels[skill.ordinal()];
            let known = self.baseline[skill.ordinal()];
            if sampled != known {
                tracing::info!("{} changed from {} to {}", skill, known, sampled);
                self.baseline[skill.ordinal()] = sampled;
                changed.push((skill, sampled));
            }
        }
        changed
    }
}

impl Default for SkillLevelTracker {
    fn default() -> Self {
        Self::new()
    }
}
