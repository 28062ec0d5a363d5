/// Jingle scheduler
///
/// Decouples level-change detection from playback and guarantees at most
/// one jingle plays at a time. Requests queue while a playback is in
/// flight; the playback thread reports completion over a channel that the
/// poll loop drains at the top of each tick, so the play guard itself is
/// owned by a single thread and a transition can be neither missed nor
/// duplicated.
use std::collections::VecDeque;

use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

use crate::client::GameClient;
use crate::player::{Playback, PlaybackOutcome};
use crate::skill::Skill;
use crate::table::{JingleVariantTable, MAX_LEVEL};

/// Ordering of queued jingle requests
///
/// `SkillOrder` dequeues the lowest skill ordinal first regardless of
/// arrival order; `Fifo` preserves arrival order. Both orderings exist in
/// the wild, so the choice is explicit configuration rather than an
/// accident of the queue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QueuePolicy {
    #[default]
    SkillOrder,
    Fifo,
}

/// Single-flight playback guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Idle,
    Playing,
}

/// Queue of pending jingle requests plus the play guard
pub struct JingleScheduler {
    queue: VecDeque<Skill>,
    policy: QueuePolicy,
    state: PlayState,
    done_tx: Sender<PlaybackOutcome>,
    done_rx: Receiver<PlaybackOutcome>,
}

impl JingleScheduler {
    pub fn new(policy: QueuePolicy) -> Self {
        let (done_tx, done_rx) = unbounded();
        Self {
            queue: VecDeque::new(),
            policy,
            state: PlayState::Idle,
            done_tx,
            done_rx,
        }
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    /// Change the ordering policy for future enqueues. Requests already
    /// queued keep their current positions.
    pub fn set_policy(&mut self, policy: QueuePolicy) {
        self.policy = policy;
    }

    /// Number of queued requests, not counting one in flight
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Add a pending jingle request for `skill`.
    ///
    /// A skill that is already queued is not queued again; its jingle is
    /// still pending, and replaying it back-to-back for a batched level
    /// report adds nothing.
    pub fn enqueue(&mut self, skill: Skill) {
        if self.queue.contains(&skill) {
            tracing::debug!("{} already queued, skipping duplicate", skill);
            return;
        }
        match self.policy {
            QueuePolicy::Fifo => self.queue.push_back(skill),
            QueuePolicy::SkillOrder => {
                let at = self
                    .queue
                    .iter()
                    .position(|queued| *queued > skill)
                    .unwrap_or(self.queue.len());
                self.queue.insert(at, skill);
            }
        }
        tracing::debug!("Queued jingle for {} ({} pending)", skill, self.queue.len());
    }

    /// One polling pass: drain completions, then dispatch at most one
    /// queued request if idle.
    ///
    /// The skill's level is fetched fresh from the client here, not cached
    /// at enqueue time; the level may have changed while the request sat
    /// in the queue.
    pub fn tick(
        &mut self,
        client: &dyn GameClient,
        table: &JingleVariantTable,
        player: &dyn Playback,
        volume_percent: u8,
    ) {
        // completions first, so a playback that ended since the last tick
        // frees the slot for this one
        while let Ok(outcome) = self.done_rx.try_recv() {
            match outcome {
                PlaybackOutcome::Finished => tracing::debug!("Jingle playback finished"),
                PlaybackOutcome::Failed => {
                    tracing::warn!("Jingle playback failed, returning to idle")
                }
            }
            self.state = PlayState::Idle;
        }

        if self.state == PlayState::Playing {
            return;
        }
        let Some(skill) = self.queue.pop_front() else {
            return;
        };

        let level = client.real_skill_level(skill);
        if !(1..=MAX_LEVEL).contains(&level) {
            tracing::warn!(
                "Host reported {} at level {}, dropping jingle request",
                skill,
                level
            );
            return;
        }

        let resource = skill.resource_name(table.variant_for(skill, level));
        tracing::info!("Dispatching jingle {} for {} at level {}", resource, skill, level);
        self.state = PlayState::Playing;
        player.dispatch(resource, volume_percent, self.done_tx.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct FixedClient {
        levels: [u8; Skill::COUNT],
    }

    impl FixedClient {
        fn with_level(skill: Skill, level: u8) -> Self {
            let mut levels = [1u8; Skill::COUNT];
            levels[skill.ordinal()] = level;
            Self { levels }
        }
    }

    impl GameClient for FixedClient {
        fn real_skill_level(&self, skill: Skill) -> u8 {
            self.levels[skill.ordinal()]
        }

        fn music_volume(&self) -> u32 {
            0
        }
    }

    /// Records dispatches and holds their completion channels so tests
    /// decide when a playback "finishes".
    #[derive(Default)]
    struct RecordingPlayback {
        dispatched: Mutex<Vec<(String, u8)>>,
        in_flight: Mutex<Vec<Sender<PlaybackOutcome>>>,
    }

    impl RecordingPlayback {
        fn dispatched(&self) -> Vec<(String, u8)> {
            self.dispatched.lock().clone()
        }

        fn complete_next(&self, outcome: PlaybackOutcome) {
            let done = self.in_flight.lock().remove(0);
            done.send(outcome).unwrap();
        }
    }

    impl Playback for RecordingPlayback {
        fn dispatch(&self, resource: String, volume_percent: u8, done: Sender<PlaybackOutcome>) {
            self.dispatched.lock().push((resource, volume_percent));
            self.in_flight.lock().push(done);
        }
    }

    fn all_primary_table() -> JingleVariantTable {
        let mut csv = String::from("Skill,levels\n");
        for skill in Skill::ALL {
            csv.push_str(skill.name());
            csv.push_str(&",0".repeat(MAX_LEVEL as usize));
            csv.push('\n');
        }
        JingleVariantTable::load(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_tick_with_empty_queue_is_a_no_op() {
        let mut scheduler = JingleScheduler::new(QueuePolicy::SkillOrder);
        let playback = RecordingPlayback::default();

        scheduler.tick(
            &FixedClient::with_level(Skill::Attack, 1),
            &all_primary_table(),
            &playback,
            50,
        );

        assert!(playback.dispatched().is_empty());
        assert_eq!(scheduler.state(), PlayState::Idle);
    }

    #[test]
    fn test_dispatch_uses_fresh_level_and_volume() {
        let mut scheduler = JingleScheduler::new(QueuePolicy::SkillOrder);
        let playback = RecordingPlayback::default();

        scheduler.enqueue(Skill::Mining);
        scheduler.tick(
            &FixedClient::with_level(Skill::Mining, 42),
            &all_primary_table(),
            &playback,
            75,
        );

        assert_eq!(playback.dispatched(), vec![("mining.ogg".to_string(), 75)]);
        assert_eq!(scheduler.state(), PlayState::Playing);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_single_flight_until_completion() {
        let mut scheduler = JingleScheduler::new(QueuePolicy::SkillOrder);
        let playback = RecordingPlayback::default();
        let client = FixedClient::with_level(Skill::Mining, 2);
        let table = all_primary_table();

        scheduler.enqueue(Skill::Mining);
        scheduler.tick(&client, &table, &playback, 50);
        scheduler.enqueue(Skill::Fishing);

        // still playing: the second request stays queued
        scheduler.tick(&client, &table, &playback, 50);
        assert_eq!(playback.dispatched().len(), 1);
        assert_eq!(scheduler.pending(), 1);

        // completion frees the slot for the same tick's dispatch
        playback.complete_next(PlaybackOutcome::Finished);
        scheduler.tick(&client, &table, &playback, 50);
        assert_eq!(playback.dispatched().len(), 2);
        assert_eq!(playback.dispatched()[1].0, "fishing.ogg");
    }

    #[test]
    fn test_failure_returns_to_idle() {
        let mut scheduler = JingleScheduler::new(QueuePolicy::SkillOrder);
        let playback = RecordingPlayback::default();
        let client = FixedClient::with_level(Skill::Mining, 2);
        let table = all_primary_table();

        scheduler.enqueue(Skill::Mining);
        scheduler.tick(&client, &table, &playback, 50);
        assert_eq!(scheduler.state(), PlayState::Playing);

        playback.complete_next(PlaybackOutcome::Failed);
        scheduler.tick(&client, &table, &playback, 50);

        // failure is not a wedge: the scheduler is idle and dispatchable
        assert_eq!(scheduler.state(), PlayState::Idle);
        scheduler.enqueue(Skill::Fishing);
        scheduler.tick(&client, &table, &playback, 50);
        assert_eq!(scheduler.state(), PlayState::Playing);
    }

    #[test]
    fn test_skill_order_policy_dequeues_lowest_ordinal() {
        let mut scheduler = JingleScheduler::new(QueuePolicy::SkillOrder);
        let playback = RecordingPlayback::default();
        let client = FixedClient::with_level(Skill::Attack, 1);
        let table = all_primary_table();

        scheduler.enqueue(Skill::Construction);
        scheduler.enqueue(Skill::Attack);
        scheduler.enqueue(Skill::Mining);

        for _ in 0..3 {
            scheduler.tick(&client, &table, &playback, 50);
            playback.complete_next(PlaybackOutcome::Finished);
        }

        let resources: Vec<String> = playback.dispatched().into_iter().map(|(r, _)| r).collect();
        assert_eq!(resources, vec!["attack.ogg", "mining.ogg", "construction.ogg"]);
    }

    #[test]
    fn test_fifo_policy_preserves_arrival_order() {
        let mut scheduler = JingleScheduler::new(QueuePolicy::Fifo);
        let playback = RecordingPlayback::default();
        let client = FixedClient::with_level(Skill::Attack, 1);
        let table = all_primary_table();

        scheduler.enqueue(Skill::Construction);
        scheduler.enqueue(Skill::Attack);

        for _ in 0..2 {
            scheduler.tick(&client, &table, &playback, 50);
            playback.complete_next(PlaybackOutcome::Finished);
        }

        let resources: Vec<String> = playback.dispatched().into_iter().map(|(r, _)| r).collect();
        assert_eq!(resources, vec!["construction.ogg", "attack.ogg"]);
    }

    #[test]
    fn test_duplicate_pending_skill_is_deduped() {
        let mut scheduler = JingleScheduler::new(QueuePolicy::SkillOrder);

        scheduler.enqueue(Skill::Mining);
        scheduler.enqueue(Skill::Mining);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn test_out_of_range_level_drops_request() {
        let mut scheduler = JingleScheduler::new(QueuePolicy::SkillOrder);
        let playback = RecordingPlayback::default();

        scheduler.enqueue(Skill::Mining);
        scheduler.tick(
            &FixedClient::with_level(Skill::Mining, 0),
            &all_primary_table(),
            &playback,
            50,
        );

        assert!(playback.dispatched().is_empty());
        assert_eq!(scheduler.state(), PlayState::Idle);
    }

    #[test]
    fn test_alternate_variant_selects_second_resource() {
        let mut csv = String::from("Skill,levels\n");
        for skill in Skill::ALL {
            csv.push_str(skill.name());
            for level in 1..=MAX_LEVEL {
                // Mining plays its alternate jingle at level 42
                let alt = skill == Skill::Mining && level == 42;
                csv.push_str(if alt { ",1" } else { ",0" });
            }
            csv.push('\n');
        }
        let table = JingleVariantTable::load(csv.as_bytes()).unwrap();

        let mut scheduler = JingleScheduler::new(QueuePolicy::SkillOrder);
        let playback = RecordingPlayback::default();

        scheduler.enqueue(Skill::Mining);
        scheduler.tick(
            &FixedClient::with_level(Skill::Mining, 42),
            &table,
            &playback,
            50,
        );

        assert_eq!(playback.dispatched()[0].0, "mining2.ogg");
    }

    #[test]
    fn test_queue_policy_serde_names() {
        assert_eq!(
            serde_json::to_string(&QueuePolicy::SkillOrder).unwrap(),
            "\"skill_order\""
        );
        let parsed: QueuePolicy = serde_json::from_str("\"fifo\"").unwrap();
        assert_eq!(parsed, QueuePolicy::Fifo);
    }
}
