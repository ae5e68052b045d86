use hound::{SampleFormat, WavSpec, WavWriter};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::status::{Led, LedDriver};

static FIXTURE_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Unique path under the system temp dir so parallel tests never collide.
pub fn temp_path(file_name: &str) -> PathBuf {
    let n = FIXTURE_COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir()
        .join("music-player-tests")
        .join(format!("{}-{}", std::process::id(), n));
    std::fs::create_dir_all(&dir).expect("Failed to create fixture directory");
    dir.join(file_name)
}

/// Writes a mono 16-bit sine tone.
pub fn write_test_tone(output_path: &Path, frequency: f32, duration_ms: u32) {
    let spec = WavSpec {
        channels: 1,
        sample_rate: 44100,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(output_path, spec).expect("Failed to create WAV writer");

    let samples_per_second = spec.sample_rate as f32;
    let total_samples = (duration_ms as f32 / 1000.0 * samples_per_second) as u32;

    for i in 0..total_samples {
        let t = i as f32 / samples_per_second;
        let sample = (t * frequency * 2.0 * std::f32::consts::PI).sin();
        let sample_value = (sample * 0.3 * i16::MAX as f32) as i16;
        writer.write_sample(sample_value).expect("Failed to write sample");
    }

    writer.finalize().expect("Failed to finalize WAV file");
}

/// LED driver that remembers the last level of each LED and every change.
#[derive(Clone, Default)]
pub struct RecordingLedDriver {
    levels: Arc<Mutex<HashMap<Led, bool>>>,
    history: Arc<Mutex<Vec<(Led, bool)>>>,
}

impl RecordingLedDriver {
    pub fn level(&self, led: Led) -> bool {
        self.levels.lock().unwrap().get(&led).copied().unwrap_or(false)
    }

    pub fn green_toggles(&self) -> usize {
        self.history.lock().unwrap().iter().filter(|(led, _)| *led == Led::Green).count()
    }

    /// Red, yellow and green levels in that order.
    pub fn lit(&self) -> (bool, bool, bool) {
        (self.level(Led::Red), self.level(Led::Yellow), self.level(Led::Green))
    }
}

impl LedDriver for RecordingLedDriver {
    fn set(&mut self, led: Led, on: bool) -> anyhow::Result<()> {
        self.levels.lock().unwrap().insert(led, on);
        self.history.lock().unwrap().push((led, on));
        Ok(())
    }
}
