/// Plugin engine
///
/// Owns the tracker, scheduler, variant table and player, and exposes the
/// two entry points the host drives: a per-tick callback and a stat-change
/// callback for volume test mode. Everything about host attachment
/// (event subscription, lifecycle, configuration UI) stays on the host
/// side of [`GameClient`].
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::bundle::JingleBundle;
use crate::client::GameClient;
use crate::config::JingleConfig;
use crate::error::AppResult;
use crate::player::{JinglePlayer, Playback};
use crate::scheduler::{JingleScheduler, PlayState};
use crate::skill::Skill;
use crate::table::JingleVariantTable;
use crate::tracker::SkillLevelTracker;

/// Filename of the variant table inside the resource directory
pub const VARIANT_TABLE_FILE: &str = "jingle_versions.csv";

pub struct SkillJingles {
    config: JingleConfig,
    table: JingleVariantTable,
    tracker: SkillLevelTracker,
    scheduler: JingleScheduler,
    player: Box<dyn Playback>,
}

impl SkillJingles {
    /// Build the engine from a resource directory holding the variant
    /// table and all 46 jingle files.
    ///
    /// Fails fast on a malformed table, a missing resource or an invalid
    /// config; the plugin must not activate with partial data.
    pub fn new(config: JingleConfig, resource_dir: &Path) -> AppResult<Self> {
        config.validate().context("validating configuration")?;

        let table = JingleVariantTable::load_from_path(&resource_dir.join(VARIANT_TABLE_FILE))
            .context("loading jingle variant table")?;
        let bundle =
            JingleBundle::load_dir(resource_dir).context("preloading jingle resources")?;
        let player =
            JinglePlayer::new(Arc::new(bundle)).with_startup_delay(config.startup_delay_ms);

        tracing::info!("Skill jingles engine started");
        Ok(Self::with_player(config, table, Box::new(player)))
    }

    /// Build the engine over an already-loaded table and an arbitrary
    /// playback implementation. Host adapters and tests use this to
    /// substitute the audio backend.
    pub fn with_player(
        config: JingleConfig,
        table: JingleVariantTable,
        player: Box<dyn Playback>,
    ) -> Self {
        let scheduler = JingleScheduler::new(config.queue_policy);
        Self {
            config,
            table,
            tracker: SkillLevelTracker::new(),
            scheduler,
            player,
        }
    }

    /// Per-tick entry point.
    ///
    /// Dispatches at most one queued jingle, then samples every skill and
    /// queues the ones that changed. A freshly queued jingle therefore
    /// plays on the next tick at the earliest. Jingles are only queued
    /// when the in-game music is muted, unless `play_on_unmute` is set.
    pub fn on_game_tick(&mut self, client: &dyn GameClient) {
        self.scheduler
            .tick(client, &self.table, self.player.as_ref(), self.config.volume);

        let mut levels = [0u8; Skill::COUNT];
        for skill in Skill::ALL {
            levels[skill.ordinal()] = client.real_skill_level(skill);
        }

        for (skill, _level) in self.tracker.observe(&levels) {
            if self.config.play_on_unmute || client.music_volume() == 0 {
                self.scheduler.enqueue(skill);
            }
        }
    }

    /// Stat-change entry point, consumed only in volume test mode.
    ///
    /// Lets the player audition jingle volume on any stat change without
    /// waiting for a real level-up. Ignored until the tracker is seeded so
    /// the login stat burst stays silent.
    pub fn on_stat_changed(&mut self, skill: Skill) {
        if self.config.test_mode && self.tracker.is_seeded() {
            self.scheduler.enqueue(skill);
        }
    }

    /// Current playback state, for host diagnostics
    pub fn play_state(&self) -> PlayState {
        self.scheduler.state()
    }

    /// Number of queued jingle requests
    pub fn pending_jingles(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn config(&self) -> &JingleConfig {
        &self.config
    }

    /// Replace the configuration, e.g. after a host config change event.
    ///
    /// The queue policy of already-queued requests is not reshuffled.
    pub fn set_config(&mut self, config: JingleConfig) -> AppResult<()> {
        config.validate().context("validating configuration")?;
        self.scheduler.set_policy(config.queue_policy);
        self.config = config;
        Ok(())
    }
}
