/// Jingle playback
///
/// Decodes a preloaded jingle resource, applies the configured volume and
/// plays it to completion on a dedicated thread, so decode and device I/O
/// never block the poll loop. Completion (success or failure) is reported
/// back over a channel the scheduler drains on its next tick.
use std::io::Cursor;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::Sender;
use rodio::{Decoder, OutputStream, Sink};

use crate::bundle::JingleBundle;
use crate::error::PlayerError;

/// Gain floor for zero volume, in decibels.
///
/// `20 * log10(0)` is -infinity; volume 0 is floored here instead, which
/// is below audibility for any output device.
pub const MIN_GAIN_DB: f32 = -80.0;

/// Map a 0-100 volume percentage to a gain in decibels.
///
/// `gain = clamp(volume/100, 0, 1)`, `dB = 20 * log10(gain)`. Volume 0
/// returns [`MIN_GAIN_DB`] rather than -infinity. 100 maps to 0 dB and
/// 50 to roughly -6.02 dB.
pub fn volume_to_db(volume_percent: u8) -> f32 {
    let gain = (volume_percent as f32 / 100.0).clamp(0.0, 1.0);
    if gain <= 0.0 {
        MIN_GAIN_DB
    } else {
        (20.0 * gain.log10()).max(MIN_GAIN_DB)
    }
}

/// Convert a decibel gain back to the linear amplitude the sink expects
pub fn db_to_amplitude(db: f32) -> f32 {
    10f32.powf(db / 20.0)
}

/// Outcome of one playback, reported to the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    Finished,
    Failed,
}

/// Playback dispatch seam
///
/// The scheduler only knows this trait; the rodio player implements it
/// and tests substitute a recording double.
pub trait Playback: Send + Sync {
    /// Start playing `resource` at `volume_percent` without blocking the
    /// caller, sending exactly one outcome on `done` when playback ends.
    fn dispatch(&self, resource: String, volume_percent: u8, done: Sender<PlaybackOutcome>);
}

/// Rodio-backed jingle player over a preloaded resource bundle
pub struct JinglePlayer {
    bundle: Arc<JingleBundle>,
    startup_delay: Duration,
}

impl JinglePlayer {
    pub fn new(bundle: Arc<JingleBundle>) -> Self {
        Self {
            bundle,
            startup_delay: Duration::ZERO,
        }
    }

    /// Sleep this long before opening the output device, per playback
    pub fn with_startup_delay(mut self, delay_ms: u64) -> Self {
        self.startup_delay = Duration::from_millis(delay_ms);
        self
    }

    fn play_blocking(
        data: Arc<Vec<u8>>,
        volume_percent: u8,
        startup_delay: Duration,
    ) -> Result<(), PlayerError> {
        if !startup_delay.is_zero() {
            thread::sleep(startup_delay);
        }

        let (_stream, stream_handle) =
            OutputStream::try_default().map_err(|e| PlayerError::DeviceUnavailable(Box::new(e)))?;
        let sink =
            Sink::try_new(&stream_handle).map_err(|e| PlayerError::DeviceUnavailable(Box::new(e)))?;

        // rodio's Decoder requires owned data with 'static lifetime
        let cursor = Cursor::new((*data).clone());
        let decoder =
            Decoder::new(cursor).map_err(|e| PlayerError::UnsupportedFormat(Box::new(e)))?;

        let db = volume_to_db(volume_percent);
        sink.set_volume(db_to_amplitude(db));
        tracing::debug!("Jingle gain set to {:.2} dB", db);

        sink.append(decoder);
        sink.play();
        // block this thread until the device buffer drains
        sink.sleep_until_end();
        Ok(())
    }
}

impl Playback for JinglePlayer {
    fn dispatch(&self, resource: String, volume_percent: u8, done: Sender<PlaybackOutcome>) {
        let data = match self.bundle.audio(&resource) {
            Some(data) => data,
            None => {
                tracing::warn!("{}", PlayerError::ResourceNotFound(resource));
                let _ = done.send(PlaybackOutcome::Failed);
                return;
            }
        };

        let startup_delay = self.startup_delay;
        let done_for_thread = done.clone();
        let spawned = thread::Builder::new()
            .name("jingle-player".to_string())
            .spawn(move || {
                tracing::info!("Playing jingle {}", resource);
                let outcome = match Self::play_blocking(data, volume_percent, startup_delay) {
                    Ok(()) => {
                        tracing::debug!("Jingle {} finished", resource);
                        PlaybackOutcome::Finished
                    }
                    Err(e) => {
                        tracing::warn!("Jingle {} failed: {}", resource, e);
                        PlaybackOutcome::Failed
                    }
                };
                let _ = done_for_thread.send(outcome);
            });

        if let Err(e) = spawned {
            tracing::warn!("Failed to spawn jingle player thread: {}", e);
            let _ = done.send(PlaybackOutcome::Failed);
        }
    }
}
