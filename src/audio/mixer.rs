use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::audio::device_manager::OutputDeviceManager;
use crate::core::PlayerError;

/// Transport operations the player drives. Implemented over rodio for the
/// application and by a recording fake in tests.
pub trait Mixer {
    /// Makes `path` the current file. Stops whatever was playing.
    fn load(&mut self, path: &Path) -> Result<(), PlayerError>;
    /// Starts the current file from the beginning.
    fn play(&mut self) -> Result<(), PlayerError>;
    fn pause(&mut self);
    fn unpause(&mut self);
    fn stop(&mut self);
    /// True while audio is queued, paused or not.
    fn is_busy(&self) -> bool;
    fn set_volume(&mut self, volume: f32);
    /// Decoder's estimate of the current file's length.
    fn decoded_duration(&self) -> Option<Duration>;
}

pub struct RodioMixer {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    sink: Option<Sink>,
    loaded: Option<PathBuf>,
    decoded_duration: Option<Duration>,
    volume: f32,
}

impl RodioMixer {
    pub fn new(devices: &OutputDeviceManager, output_device_name: Option<&str>, volume: f32) -> Result<Self, PlayerError> {
        let device = devices.resolve(output_device_name)
            .map_err(|e| PlayerError::Output(e.to_string()))?;

        let (stream, stream_handle) = OutputStream::try_from_device(&device)
            .map_err(|e| {
                log::error!("Failed to create output stream: {}", e);
                PlayerError::Output(e.to_string())
            })?;

        log::info!("Audio output stream opened");
        Ok(RodioMixer {
            _stream: stream,
            stream_handle,
            sink: None,
            loaded: None,
            decoded_duration: None,
            volume: volume.clamp(0.0, 1.0),
        })
    }

    fn decode(path: &Path) -> Result<Decoder<BufReader<File>>, PlayerError> {
        let file = File::open(path).map_err(|source| {
            log::error!("Failed to open music file '{}': {}", path.display(), source);
            PlayerError::Open { path: path.to_path_buf(), source }
        })?;

        Decoder::new(BufReader::new(file)).map_err(|e| {
            log::error!("Failed to decode music file '{}': {}", path.display(), e);
            PlayerError::Decode {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })
    }
}

impl Mixer for RodioMixer {
    fn load(&mut self, path: &Path) -> Result<(), PlayerError> {
        let source = Self::decode(path)?;
        self.stop();
        self.decoded_duration = source.total_duration();
        self.loaded = Some(path.to_path_buf());
        log::debug!("Mixer loaded {} (decoder duration {:?})", path.display(), self.decoded_duration);
        Ok(())
    }

    fn play(&mut self) -> Result<(), PlayerError> {
        let path = self.loaded.clone().ok_or(PlayerError::NoTrackLoaded)?;

        // The old sink keeps playing until the replacement is ready.
        let source = Self::decode(&path)?;
        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| {
                log::error!("Failed to create audio sink: {}", e);
                PlayerError::Playback(e.to_string())
            })?;
        self.stop();

        sink.set_volume(self.volume);
        sink.append(source);
        sink.play();
        self.sink = Some(sink);

        log::info!("Playing {} at volume {:.0}%", path.display(), self.volume * 100.0);
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn unpause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            log::debug!("Stopping current sink");
            sink.stop();
        }
    }

    fn is_busy(&self) -> bool {
        self.sink.as_ref().map(|sink| !sink.empty()).unwrap_or(false)
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(sink) = &self.sink {
            sink.set_volume(self.volume);
        }
    }

    fn decoded_duration(&self) -> Option<Duration> {
        self.decoded_duration
    }
}

impl Drop for RodioMixer {
    fn drop(&mut self) {
        self.stop();
    }
}
