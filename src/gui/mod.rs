pub mod app;
pub mod progress;


pub use app::*;
