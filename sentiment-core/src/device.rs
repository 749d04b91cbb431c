//! Compute device preference for capability construction.

use serde::{Deserialize, Serialize};

/// Environment variable whose value `cpu` disables accelerator use.
pub const DEVICE_ENV: &str = "CLINICAL_SENTIMENT_DEVICE";

/// Which compute device classifier capabilities may use.
///
/// The ensemble never interprets this; it is handed to every
/// [`CapabilityFactory::build`](crate::slot::CapabilityFactory::build) call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePreference {
    /// Let each capability pick the best available device.
    #[default]
    Auto,
    /// Never use an accelerator.
    Cpu,
}

impl DevicePreference {
    /// Resolve the force-CPU toggle from a raw variable value.
    ///
    /// Only `cpu` (case-insensitive, surrounding whitespace ignored) forces
    /// the CPU; any other value, or no value, means [`DevicePreference::Auto`].
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("cpu") => DevicePreference::Cpu,
            _ => DevicePreference::Auto,
        }
    }

    /// Read [`DEVICE_ENV`].
    pub fn from_env() -> Self {
        Self::from_value(std::env::var(DEVICE_ENV).ok().as_deref())
    }

    pub fn is_cpu_forced(&self) -> bool {
        matches!(self, DevicePreference::Cpu)
    }
}

impl std::fmt::Display for DevicePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DevicePreference::Auto => write!(f, "auto"),
            DevicePreference::Cpu => write!(f, "cpu"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_value_forces_cpu() {
        assert_eq!(DevicePreference::from_value(Some("cpu")), DevicePreference::Cpu);
        assert_eq!(DevicePreference::from_value(Some("CPU")), DevicePreference::Cpu);
        assert_eq!(DevicePreference::from_value(Some(" cpu\n")), DevicePreference::Cpu);
    }

    #[test]
    fn test_other_values_auto_select() {
        assert_eq!(DevicePreference::from_value(None), DevicePreference::Auto);
        assert_eq!(DevicePreference::from_value(Some("")), DevicePreference::Auto);
        assert_eq!(DevicePreference::from_value(Some("gpu")), DevicePreference::Auto);
        assert_eq!(DevicePreference::from_value(Some("cuda:0")), DevicePreference::Auto);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&DevicePreference::Cpu).unwrap();
        assert_eq!(json, "\"cpu\"");
        let parsed: DevicePreference = serde_json::from_str("\"auto\"").unwrap();
        assert_eq!(parsed, DevicePreference::Auto);
    }
}
