use cpal::{Device, Host};
use cpal::traits::{DeviceTrait, HostTrait};

#[derive(Debug, Clone, PartialEq)]
pub struct OutputDeviceInfo {
    pub name: String,
    pub is_default: bool,
}

/// Output devices known to the default cpal host.
pub struct OutputDeviceManager {
    host: Host,
    devices: Vec<OutputDeviceInfo>,
}

impl OutputDeviceManager {
    pub fn new() -> anyhow::Result<Self> {
        let mut manager = OutputDeviceManager {
            host: cpal::default_host(),
            devices: Vec::new(),
        };

        if let Err(e) = manager.refresh() {
            log::error!("Failed to enumerate audio devices: {}", e);
            return Err(anyhow::anyhow!("Failed to enumerate audio devices: {}", e));
        }

        Ok(manager)
    }

    pub fn refresh(&mut self) -> anyhow::Result<()> {
        let default_name = self.host.default_output_device()
            .and_then(|device| device.name().ok());

        let devices = self.host.output_devices()
            .map_err(|e| {
                log::error!("Failed to enumerate output devices: {}", e);
                anyhow::anyhow!("Failed to enumerate output devices: {}", e)
            })?;

        self.devices = devices
            .filter_map(|device| match device.name() {
                Ok(name) => Some(name),
                Err(e) => {
                    log::warn!("Skipping output device without a name: {}", e);
                    None
                }
            })
            .map(|name| OutputDeviceInfo {
                is_default: default_name.as_deref() == Some(name.as_str()),
                name,
            })
            .collect();

        log::info!("Found {} audio output devices", self.devices.len());
        Ok(())
    }

    pub fn devices(&self) -> &[OutputDeviceInfo] {
        &self.devices
    }

    /// Resolves the configured device, falling back to the system default.
    pub fn resolve(&self, name: Option<&str>) -> anyhow::Result<Device> {
        let Some(name) = name else {
            log::debug!("No output device configured, using default");
            return self.default_device();
        };

        let found = self.host.output_devices()
            .map_err(|e| anyhow::anyhow!("Failed to enumerate devices: {}", e))?
            .find(|device| device.name().map(|n| n == name).unwrap_or(false));

        match found {
            Some(device) => {
                log::debug!("Using configured output device: {}", name);
                Ok(device)
            }
            None => {
                log::warn!("Output device '{}' not found, falling back to default", name);
                self.default_device()
            }
        }
    }

    fn default_device(&self) -> anyhow::Result<Device> {
        self.host.default_output_device()
            .ok_or_else(|| {
                log::error!("No default audio output device available");
                anyhow::anyhow!("No default audio output device available")
            })
    }
}
