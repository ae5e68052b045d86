pub mod config;
pub mod error;
pub mod playback;
pub mod track;


pub use config::*;
pub use error::PlayerError;
pub use playback::*;
pub use track::*;
