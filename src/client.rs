/// Host client seam
///
/// The queries this crate needs from the game client. The host plugin
/// adapts its client object to this trait; tests script it.
use crate::skill::Skill;

pub trait GameClient {
    /// Current real (unboosted) level of a skill, 1-99
    fn real_skill_level(&self, skill: Skill) -> u8;

    /// Current in-game music volume; 0 means music is muted
    fn music_volume(&self) -> u32;
}
