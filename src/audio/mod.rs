pub mod device_manager;
pub mod mixer;

pub use device_manager::{OutputDeviceInfo, OutputDeviceManager};
pub use mixer::{Mixer, RodioMixer};
