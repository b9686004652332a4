//! Machine configuration parameters
//!
//! The tunable parameters the user can change from the display and that are
//! persisted in the configuration record. The running configuration starts
//! from [`MachineConfig::default`] and is replaced by the stored record when
//! its checksum verifies.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Fixed control cycle interval. Also forced into `PidGains::sample_time_ms`
/// whenever settings are applied.
pub const SAMPLE_INTERVAL_MS: u32 = 100;

// Accepted ranges for user-supplied settings.
const BREW_TEMP_RANGE_C: core::ops::RangeInclusive<u32> = 60..=110;
const STEAM_TEMP_RANGE_C: core::ops::RangeInclusive<u32> = 100..=160;
const MAX_PHASE_SECS: u32 = 60;
const MAX_PRESSURE_BAR: f32 = 12.0;

/// Gains for the brew-mode PID delegate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    /// Delegate sample period in milliseconds
    pub sample_time_ms: u32,
}

impl Default for PidGains {
    fn default() -> Self {
        Self {
            kp: 30.0,
            ki: 0.5,
            kd: 60.0,
            sample_time_ms: SAMPLE_INTERVAL_MS,
        }
    }
}

/// Automatic shot profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreinfusionConfig {
    /// Low-pressure wetting phase (seconds)
    pub duration_secs: u32,
    /// Zero-pressure dwell after preinfusion (seconds)
    pub soak_secs: u32,
    /// Pressure during preinfusion (bar)
    pub preinfusion_bar: f32,
    /// Pressure during full extraction (bar)
    pub brewing_bar: f32,
}

impl PreinfusionConfig {
    pub fn preinfusion_end_ms(&self) -> u64 {
        u64::from(self.duration_secs) * 1000
    }

    pub fn soak_end_ms(&self) -> u64 {
        self.preinfusion_end_ms() + u64::from(self.soak_secs) * 1000
    }
}

impl Default for PreinfusionConfig {
    fn default() -> Self {
        Self {
            duration_secs: 5,
            soak_secs: 3,
            preinfusion_bar: 2.0,
            brewing_bar: 9.0,
        }
    }
}

/// Complete persisted configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    // --- Boiler ---
    /// Brew-mode boiler setpoint (Celsius)
    pub target_brew_temp_c: u32,
    /// Steam-mode boiler setpoint (Celsius)
    pub target_steam_temp_c: u32,
    pub pid_gains: PidGains,

    // --- Shot profile ---
    pub preinfusion: PreinfusionConfig,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            target_brew_temp_c: 93,
            target_steam_temp_c: 140,
            pid_gains: PidGains::default(),
            preinfusion: PreinfusionConfig::default(),
        }
    }
}

impl MachineConfig {
    /// Copy of this configuration with the delegate sample time pinned to the
    /// control cycle interval.
    pub fn with_fixed_sample_time(mut self) -> Self {
        self.pid_gains.sample_time_ms = SAMPLE_INTERVAL_MS;
        self
    }

    /// Range-check values coming from the user interface.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !BREW_TEMP_RANGE_C.contains(&self.target_brew_temp_c) {
            return Err(ConfigError::ValidationFailed(
                "brew temperature must be 60..=110 C",
            ));
        }
        if !STEAM_TEMP_RANGE_C.contains(&self.target_steam_temp_c) {
            return Err(ConfigError::ValidationFailed(
                "steam temperature must be 100..=160 C",
            ));
        }
        if self.target_steam_temp_c < self.target_brew_temp_c {
            return Err(ConfigError::ValidationFailed(
                "steam temperature below brew temperature",
            ));
        }

        let g = &self.pid_gains;
        if [g.kp, g.ki, g.kd]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(ConfigError::ValidationFailed(
                "PID gains must be finite and non-negative",
            ));
        }
        if g.sample_time_ms == 0 {
            return Err(ConfigError::ValidationFailed("sample time must be > 0"));
        }

        let p = &self.preinfusion;
        if p.duration_secs > MAX_PHASE_SECS || p.soak_secs > MAX_PHASE_SECS {
            return Err(ConfigError::ValidationFailed(
                "preinfusion and soak must be at most 60 s",
            ));
        }
        for bar in [p.preinfusion_bar, p.brewing_bar] {
            if !bar.is_finite() || !(0.0..=MAX_PRESSURE_BAR).contains(&bar) {
                return Err(ConfigError::ValidationFailed(
                    "pressure must be 0..=12 bar",
                ));
            }
        }

        Ok(())
    }
}

/// Where the running configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Loaded from a record whose checksum verified, or saved since startup.
    Stored,
    /// Factory defaults; the stored record could not be used.
    Defaults { reason: ConfigError },
}

impl ConfigSource {
    pub fn is_defaults(&self) -> bool {
        matches!(self, Self::Defaults { .. })
    }
}
