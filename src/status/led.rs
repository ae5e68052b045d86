#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Led {
    Red,
    Yellow,
    Green,
}

impl Led {
    pub const ALL: [Led; 3] = [Led::Red, Led::Yellow, Led::Green];
}

pub trait LedDriver: Send {
    fn set(&mut self, led: Led, on: bool) -> anyhow::Result<()>;
}

/// Stand-in used when no GPIO header is available.
#[derive(Debug, Default)]
pub struct LogLedDriver;

impl LedDriver for LogLedDriver {
    fn set(&mut self, led: Led, on: bool) -> anyhow::Result<()> {
        log::debug!("LED {:?} -> {}", led, if on { "on" } else { "off" });
        Ok(())
    }
}

#[cfg(feature = "gpio")]
pub use gpio::GpioLedDriver;

#[cfg(feature = "gpio")]
mod gpio {
    use super::{Led, LedDriver};
    use crate::core::StatusLedConfig;
    use rppal::gpio::{Gpio, OutputPin};

    pub struct GpioLedDriver {
        red: OutputPin,
        yellow: OutputPin,
        green: OutputPin,
    }

    impl GpioLedDriver {
        pub fn new(config: &StatusLedConfig) -> anyhow::Result<Self> {
            let gpio = Gpio::new()
                .map_err(|e| anyhow::anyhow!("Failed to open GPIO: {}", e))?;
            let output = |pin: u8| -> anyhow::Result<OutputPin> {
                let pin = gpio.get(pin)
                    .map_err(|e| anyhow::anyhow!("Failed to claim GPIO pin {}: {}", pin, e))?;
                Ok(pin.into_output_low())
            };

            log::info!("GPIO status LEDs on pins red={} yellow={} green={}",
                config.red_pin, config.yellow_pin, config.green_pin);
            Ok(GpioLedDriver {
                red: output(config.red_pin)?,
                yellow: output(config.yellow_pin)?,
                green: output(config.green_pin)?,
            })
        }
    }

    impl LedDriver for GpioLedDriver {
        fn set(&mut self, led: Led, on: bool) -> anyhow::Result<()> {
            let pin = match led {
                Led::Red => &mut self.red,
                Led::Yellow => &mut self.yellow,
                Led::Green => &mut self.green,
            };
            if on {
                pin.set_high();
            } else {
                pin.set_low();
            }
            Ok(())
        }
    }
}
