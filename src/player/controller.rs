use std::path::Path;
use std::time::Instant;

use crate::audio::Mixer;
use crate::core::{
    is_supported_audio_file, LoadedTrack, PlaybackClock, PlaybackState, PlayerError,
    ProgressSnapshot, TrackMetadata,
};
use crate::status::StatusIndicator;

/// Routes transport requests from the buttons and the remote to the mixer
/// and keeps the derived state (duration, pause flag, clock, LEDs) in step.
pub struct PlayerController {
    mixer: Box<dyn Mixer>,
    track: Option<LoadedTrack>,
    state: PlaybackState,
    clock: PlaybackClock,
    indicator: Option<StatusIndicator>,
}

impl PlayerController {
    pub fn new(mixer: Box<dyn Mixer>, indicator: Option<StatusIndicator>) -> Self {
        let mut controller = Self {
            mixer,
            track: None,
            state: PlaybackState::Empty,
            clock: PlaybackClock::new(),
            indicator,
        };
        controller.publish_state();
        controller
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn track(&self) -> Option<&LoadedTrack> {
        self.track.as_ref()
    }

    pub fn load(&mut self, path: &Path) -> Result<&LoadedTrack, PlayerError> {
        if !is_supported_audio_file(path) {
            return Err(PlayerError::UnsupportedFormat(path.to_path_buf()));
        }

        self.mixer.load(path)?;
        self.clock.reset();

        let mut metadata = TrackMetadata::read(path)?;
        if metadata.duration.is_none() {
            metadata.duration = self.mixer.decoded_duration();
        }

        log::info!("Loaded {} (duration {:?})", path.display(), metadata.duration);
        self.set_state(PlaybackState::Stopped);
        Ok(self.track.insert(LoadedTrack {
            path: path.to_path_buf(),
            metadata,
        }))
    }

    pub fn play(&mut self, now: Instant) -> Result<(), PlayerError> {
        if self.track.is_none() {
            return Err(PlayerError::NoTrackLoaded);
        }

        if let Err(e) = self.mixer.play() {
            self.mixer.stop();
            self.clock.reset();
            self.set_state(PlaybackState::Stopped);
            return Err(e);
        }
        self.clock.start(now);
        self.set_state(PlaybackState::Playing);
        Ok(())
    }

    /// Pauses while playing, resumes while paused, ignored otherwise.
    pub fn toggle_pause(&mut self, now: Instant) {
        match self.state {
            PlaybackState::Playing => {
                self.mixer.pause();
                self.clock.pause(now);
                self.set_state(PlaybackState::Paused);
            }
            PlaybackState::Paused => {
                self.mixer.unpause();
                self.clock.resume(now);
                self.set_state(PlaybackState::Playing);
            }
            PlaybackState::Stopped | PlaybackState::Empty => {
                log::debug!("Pause ignored while {}", self.state.label());
            }
        }
    }

    pub fn stop(&mut self) {
        self.mixer.stop();
        self.clock.reset();
        if self.track.is_some() {
            self.set_state(PlaybackState::Stopped);
        }
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.mixer.set_volume(volume.clamp(0.0, 1.0));
    }

    /// Samples elapsed time and notices when the mixer ran out of audio.
    pub fn poll(&mut self, now: Instant) -> ProgressSnapshot {
        if self.state == PlaybackState::Playing && !self.mixer.is_busy() {
            log::info!("Playback finished");
            self.clock.reset();
            self.set_state(PlaybackState::Stopped);
        }

        ProgressSnapshot {
            elapsed: self.clock.elapsed(now),
            duration: self.track.as_ref().and_then(|t| t.metadata.duration),
        }
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            log::debug!("Playback state {:?} -> {:?}", self.state, state);
        }
        self.state = state;
        self.publish_state();
    }

    fn publish_state(&mut self) {
        if let Some(indicator) = &mut self.indicator {
            indicator.show(self.state);
        }
    }
}
