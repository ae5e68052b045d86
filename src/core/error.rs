use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    #[error("no music file loaded")]
    NoTrackLoaded,

    #[error("unsupported file type: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },

    #[error("audio output unavailable: {0}")]
    Output(String),

    #[error("playback failed: {0}")]
    Playback(String),
}
