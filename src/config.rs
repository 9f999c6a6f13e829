use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const LOOKAHEAD_RANGE: RangeInclusive<u32> = 7..=90;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Horizon in days over which urgency colors are normalized.
    pub lookahead_days: u32,
    pub radius: RadiusConfig,
    pub urgency: UrgencyConfig,
    pub pack: PackConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lookahead_days: 30,
            radius: RadiusConfig::default(),
            urgency: UrgencyConfig::default(),
            pack: PackConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn lookahead(&self) -> u32 {
        self.lookahead_days
            .clamp(*LOOKAHEAD_RANGE.start(), *LOOKAHEAD_RANGE.end())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadiusConfig {
    pub min_radius: f32,
    /// Largest radius as a fraction of the smaller viewport side.
    pub max_fraction: f32,
    pub max_ceiling: f32,
}

impl Default for RadiusConfig {
    fn default() -> Self {
        Self {
            min_radius: 28.0,
            max_fraction: 0.28,
            max_ceiling: 140.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrgencyConfig {
    pub far_hue: f32,
    pub near_hue: f32,
    pub saturation: f32,
    pub lightness: f32,
    pub overdue_hue: f32,
    pub overdue_lightness: f32,
}

impl Default for UrgencyConfig {
    fn default() -> Self {
        Self {
            far_hue: 220.0,
            near_hue: 0.0,
            saturation: 90.0,
            lightness: 58.0,
            overdue_hue: 0.0,
            overdue_lightness: 50.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackConfig {
    /// Minimum visual spacing between two circle boundaries.
    pub gap: f32,
    pub relax_base_iterations: usize,
    pub relax_iterations_per_item: usize,
    pub relax_max_iterations: usize,
    pub spiral_angle_step: f32,
    pub spiral_base_distance: f32,
    pub spiral_distance_step: f32,
    /// Surplus distance above which a pair is pulled back together.
    pub attraction_slack: f32,
    pub attraction_rate: f32,
    pub attraction_max_step: f32,
    pub center_pull: f32,
    pub resolve_passes: usize,
    pub resolve_tolerance: f32,
    pub jitter_seed: u64,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            gap: 0.5,
            relax_base_iterations: 300,
            relax_iterations_per_item: 45,
            relax_max_iterations: 1200,
            spiral_angle_step: 0.6,
            spiral_base_distance: 4.0,
            spiral_distance_step: 2.0,
            attraction_slack: 0.75,
            attraction_rate: 0.25,
            attraction_max_step: 0.8,
            center_pull: 0.02,
            resolve_passes: 32,
            resolve_tolerance: 0.1,
            jitter_seed: 0x5eed_b0b1,
        }
    }
}

impl PackConfig {
    pub fn relax_iterations(&self, item_count: usize) -> usize {
        self.relax_base_iterations
            .saturating_add(item_count.saturating_mul(self.relax_iterations_per_item))
            .min(self.relax_max_iterations)
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<EngineConfig> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: EngineConfig = serde_json::from_str(&raw)
        .with_context(|| format!("invalid config JSON in {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn iteration_budget_scales_with_items_and_caps() {
        let pack = PackConfig::default();
        assert_eq!(pack.relax_iterations(0), 300);
        assert_eq!(pack.relax_iterations(5), 525);
        assert_eq!(pack.relax_iterations(20), 1200);
        assert_eq!(pack.relax_iterations(usize::MAX), 1200);
    }

    #[test]
    fn lookahead_is_clamped_into_range() {
        let mut config = EngineConfig::default();
        assert_eq!(config.lookahead(), 30);
        config.lookahead_days = 1;
        assert_eq!(config.lookahead(), 7);
        config.lookahead_days = 365;
        assert_eq!(config.lookahead(), 90);
    }

    #[test]
    fn partial_config_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "lookahead_days": 14, "pack": {{ "gap": 2.0 }} }}"#).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.lookahead_days, 14);
        assert_eq!(config.pack.gap, 2.0);
        assert_eq!(config.pack.center_pull, PackConfig::default().center_pull);
        assert_eq!(config.radius, RadiusConfig::default());
    }

    #[test]
    fn malformed_config_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let error = load_config(file.path()).unwrap_err();
        assert!(format!("{error:#}").contains("invalid config JSON"));
    }
}
