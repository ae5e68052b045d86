pub mod indicator;
pub mod led;


pub use indicator::StatusIndicator;
pub use led::{Led, LedDriver, LogLedDriver};

use crate::core::StatusLedConfig;
use std::time::Duration;

/// Builds the indicator for the configured hardware, or `None` when disabled.
///
/// Without the `gpio` feature, or when the GPIO header cannot be opened,
/// LED changes are only logged.
pub fn indicator_from_config(config: &StatusLedConfig) -> Option<StatusIndicator> {
    if !config.enabled {
        return None;
    }

    let interval = Duration::from_millis(config.blink_interval_ms.max(1));
    Some(StatusIndicator::new(driver_from_config(config), interval))
}

#[cfg(feature = "gpio")]
fn driver_from_config(config: &StatusLedConfig) -> Box<dyn LedDriver> {
    match led::GpioLedDriver::new(config) {
        Ok(driver) => Box::new(driver),
        Err(e) => {
            log::error!("GPIO unavailable, status LEDs will only be logged: {}", e);
            Box::new(LogLedDriver)
        }
    }
}

#[cfg(not(feature = "gpio"))]
fn driver_from_config(_config: &StatusLedConfig) -> Box<dyn LedDriver> {
    log::warn!("Built without the gpio feature, status LEDs will only be logged");
    Box::new(LogLedDriver)
}
