use serde::Serialize;

use crate::config::Config;

/// Coarse device position attached to a batch when available.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Geolocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// Identity of the device a batch was recorded on.
#[derive(Debug, Clone)]
pub struct DeviceContext {
    pub model: String,
    pub api_level: i64,
    pub device_id: String,
}

/// Boundary to the host platform: device identity and best-effort location.
///
/// `locate` must never fail a sync attempt; no position means the batch goes
/// out without location fields.
#[allow(async_fn_in_trait)]
pub trait DeviceProvider {
    fn device(&self) -> DeviceContext;
    async fn locate(&self) -> Option<Geolocation>;
}

/// Default provider: model detected from the host, API level and optional
/// fixed position taken from configuration, device id persisted in app state.
pub struct HostDevice {
    context: DeviceContext,
    location: Option<Geolocation>,
}

impl HostDevice {
    pub fn new(config: &Config, device_id: String) -> Self {
        let model = config.device.model.clone().unwrap_or_else(|| {
            format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH)
        });
        let api_level = config.device.api_level.unwrap_or(0);
        let location = config.location.as_ref().map(|l| Geolocation {
            latitude: l.latitude,
            longitude: l.longitude,
        });
        Self {
            context: DeviceContext {
                model,
                api_level,
                device_id,
            },
            location,
        }
    }
}

impl DeviceProvider for HostDevice {
    fn device(&self) -> DeviceContext {
        self.context.clone()
    }

    async fn locate(&self) -> Option<Geolocation> {
        self.location
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn host_device_reads_overrides_from_config() {
        let config: Config = toml::from_str(
            r#"
            endpoint = "https://sync.example.org"

            [device]
            model = "tablet-a8"
            api_level = 34

            [location]
            latitude = 8.46
            longitude = -13.23
            "#,
        )
        .unwrap();
        let device = HostDevice::new(&config, "dev-1".to_string());
        let context = device.device();
        assert_eq!(context.model, "tablet-a8");
        assert_eq!(context.api_level, 34);
        assert_eq!(context.device_id, "dev-1");
        assert_eq!(
            device.locate().await,
            Some(Geolocation {
                latitude: 8.46,
                longitude: -13.23
            })
        );
    }

    #[tokio::test]
    async fn host_device_degrades_to_no_location() {
        let config = Config::default();
        let device = HostDevice::new(&config, "dev-2".to_string());
        assert!(device.locate().await.is_none());
        assert!(!device.device().model.is_empty());
    }
}
