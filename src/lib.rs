//! Skill level-up jingle engine.
//!
//! Detects skill level increases across a host-driven polling loop and
//! plays a short per-skill audio cue, choosing between two jingle variants
//! by level, at a configured volume, with playback serialized so cues
//! never overlap.
//!
//! ## Architecture
//!
//! ```text
//! host tick ──> SkillJingles::on_game_tick
//!                 ├── JingleScheduler::tick ──> Playback (rodio thread)
//!                 │         ^                        │
//!                 │         └── completion channel ──┘
//!                 ├── SkillLevelTracker::observe
//!                 └── enqueue changed skills (music-mute gate)
//! ```
//!
//! The poll loop never blocks on audio: each playback runs on its own
//! thread and reports back over a crossbeam channel. The host adapts its
//! client object to [`GameClient`] and forwards tick and stat-change
//! events; everything else (lifecycle, configuration UI, event wiring)
//! stays host-side.

pub mod bundle;
pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod player;
pub mod scheduler;
pub mod skill;
pub mod table;
pub mod tracker;

pub use bundle::JingleBundle;
pub use client::GameClient;
pub use config::JingleConfig;
pub use engine::SkillJingles;
pub use error::{AppResult, BundleError, ConfigError, PlayerError, TableError};
pub use player::{JinglePlayer, Playback, PlaybackOutcome};
pub use scheduler::{JingleScheduler, PlayState, QueuePolicy};
pub use skill::Skill;
pub use table::{JingleVariantTable, MAX_LEVEL};
pub use tracker::SkillLevelTracker;
