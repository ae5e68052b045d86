use lofty::prelude::{Accessor, AudioFile, TaggedFileExt};
use lofty::file::TaggedFile;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::PlayerError;

/// Extensions offered by the file dialog and accepted by `load`.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["mp3", "wav", "ogg", "flac"];

pub fn is_supported_audio_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub year: Option<u32>,
    pub genre: Option<String>,
    pub duration: Option<Duration>,
}

impl TrackMetadata {
    /// Reads embedded tags and stream properties.
    ///
    /// Files lofty cannot parse (damaged headers or tags) yield empty
    /// metadata rather than an error; only an unreadable file is an error.
    pub fn read(path: &Path) -> Result<Self, PlayerError> {
        std::fs::File::open(path).map_err(|source| PlayerError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let tagged_file = match read_tagged_file(path) {
            Ok(file) => file,
            Err(e) => {
                log::warn!("Failed to read tags from {}: {}", path.display(), e);
                return Ok(Self::default());
            }
        };

        let tag = tagged_file.primary_tag().or(tagged_file.first_tag());
        let duration = Some(tagged_file.properties().duration()).filter(|d| !d.is_zero());

        let metadata = TrackMetadata {
            title: tag.and_then(|t| t.title().map(|s| s.to_string())),
            artist: tag.and_then(|t| t.artist().map(|s| s.to_string())),
            album: tag.and_then(|t| t.album().map(|s| s.to_string())),
            year: tag.and_then(year_from_tag),
            genre: tag.and_then(|t| t.genre().map(|s| s.to_string())),
            duration,
        };

        log::debug!("Read metadata for {}: {:?}", path.display(), metadata);
        Ok(metadata)
    }
}

/// Falls back to the leading digits of the raw year or recording date, so
/// values like "2020-05-01" still resolve.
pub fn year_from_tag(tag: &Tag) -> Option<u32> {
    if let Some(year) = tag.year() {
        return Some(year);
    }

    tag.get_string(&ItemKey::Year)
        .or_else(|| tag.get_string(&ItemKey::RecordingDate))
        .and_then(|raw| raw.trim().chars().take(4).collect::<String>().parse::<u32>().ok())
}

fn read_tagged_file(path: &Path) -> anyhow::Result<TaggedFile> {
    Ok(Probe::open(path)?.guess_file_type()?.read()?)
}

#[derive(Debug, Clone)]
pub struct LoadedTrack {
    pub path: PathBuf,
    pub metadata: TrackMetadata,
}

impl LoadedTrack {
    pub fn display_title(&self) -> String {
        self.metadata.title.clone().unwrap_or_else(|| {
            self.path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "Unknown".to_string())
        })
    }

    pub fn display_artist(&self) -> &str {
        self.metadata.artist.as_deref().unwrap_or("Unknown")
    }

    pub fn display_album(&self) -> &str {
        self.metadata.album.as_deref().unwrap_or("Unknown")
    }

    pub fn display_genre(&self) -> &str {
        self.metadata.genre.as_deref().unwrap_or("Unknown")
    }

    pub fn display_year(&self) -> String {
        self.metadata
            .year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
