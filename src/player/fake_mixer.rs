use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::audio::Mixer;
use crate::core::PlayerError;

#[derive(Debug, Clone, PartialEq)]
pub enum MixerCall {
    Load(PathBuf),
    Play,
    Pause,
    Unpause,
    Stop,
    SetVolume(f32),
}

/// Mixer that records every call. Clones share the same log, so a test can
/// keep one handle after boxing another into the controller.
#[derive(Clone, Default)]
pub struct FakeMixer {
    pub calls: Arc<Mutex<Vec<MixerCall>>>,
    pub busy: Arc<AtomicBool>,
    pub fail_play: Arc<AtomicBool>,
    pub duration: Option<Duration>,
}

impl FakeMixer {
    pub fn calls(&self) -> Vec<MixerCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn finish_track(&self) {
        self.busy.store(false, Ordering::SeqCst);
    }

    fn record(&self, call: MixerCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Mixer for FakeMixer {
    fn load(&mut self, path: &Path) -> Result<(), PlayerError> {
        if !path.exists() {
            return Err(PlayerError::Open {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
            });
        }
        self.busy.store(false, Ordering::SeqCst);
        self.record(MixerCall::Load(path.to_path_buf()));
        Ok(())
    }

    fn play(&mut self) -> Result<(), PlayerError> {
        if self.fail_play.load(Ordering::SeqCst) {
            self.busy.store(false, Ordering::SeqCst);
            return Err(PlayerError::Playback("device lost".to_string()));
        }
        self.busy.store(true, Ordering::SeqCst);
        self.record(MixerCall::Play);
        Ok(())
    }

    fn pause(&mut self) {
        self.record(MixerCall::Pause);
    }

    fn unpause(&mut self) {
        self.record(MixerCall::Unpause);
    }

    fn stop(&mut self) {
        self.busy.store(false, Ordering::SeqCst);
        self.record(MixerCall::Stop);
    }

    fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    fn set_volume(&mut self, volume: f32) {
        self.record(MixerCall::SetVolume(volume));
    }

    fn decoded_duration(&self) -> Option<Duration> {
        self.duration
    }
}
