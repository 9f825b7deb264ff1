// Output device discovery

use cpal::traits::{DeviceTrait, HostTrait};
use cpal::{Device, Host};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputDeviceInfo {
    pub name: String,
    pub is_default: bool,
}

pub struct OutputDeviceManager {
    host: Host,
}

impl OutputDeviceManager {
    pub fn new() -> Self {
        Self {
            host: cpal::default_host(),
        }
    }

    /// List every output device the host exposes
    pub fn list_output_devices(&self) -> Vec<OutputDeviceInfo> {
        let default_name = self
            .host
            .default_output_device()
            .and_then(|d| d.name().ok())
            .unwrap_or_default();

        let mut devices = Vec::new();
        if let Ok(output_devices) = self.host.output_devices() {
            for device in output_devices {
                if let Ok(name) = device.name() {
                    devices.push(OutputDeviceInfo {
                        is_default: name == default_name,
                        name,
                    });
                }
            }
        }
        devices
    }

    /// Device by name, falling back to the host default
    pub fn output_device(&self, preferred: Option<&str>) -> Option<Device> {
        if let Some(wanted) = preferred {
            if let Ok(devices) = self.host.output_devices() {
                for device in devices {
                    if let Ok(name) = device.name()
                        && name == wanted
                    {
                        return Some(device);
                    }
                }
            }
            log::warn!("Output device '{}' not found, using default", wanted);
        }
        self.host.default_output_device()
    }
}

impl Default for OutputDeviceManager {
    fn default() -> Self {
        Self::new()
    }
}
