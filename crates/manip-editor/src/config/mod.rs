//! Manipulator configuration module
//!
//! Default parameters for the manipulation commands a host offers: layout
//! spacing, snapping, rotation steps and measurement overlays.

mod manager;

pub use manager::{ConfigError, ConfigManager, SharedConfig, create_shared_config, save_to_path};

use glam::Vec3;
use manip_core::ops::GroundProbe;
use manip_core::{DEFAULT_MAX_CONNECTIONS, DEFAULT_SIZE_EPSILON};
use serde::{Deserialize, Serialize};

/// Arrangement defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArrangementConfig {
    /// Spacing between arranged objects (X for lines, X/Z for grids)
    pub spacing: Vec3,
    /// Scatter range for random arrangement
    pub random_range: f32,
}

impl Default for ArrangementConfig {
    fn default() -> Self {
        let spacing = Vec3::new(2.0, 0.0, 0.0);
        Self {
            spacing,
            random_range: spacing.length(),
        }
    }
}

/// Snapping defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapConfig {
    pub grid_size: f32,
    /// Vertical gap between stacked objects
    pub stack_padding: f32,
    /// Height above the pivot that ground rays start from
    pub ground_ray_height: f32,
    pub ground_ray_distance: f32,
}

impl Default for SnapConfig {
    fn default() -> Self {
        let probe = GroundProbe::default();
        Self {
            grid_size: 1.0,
            stack_padding: 0.0,
            ground_ray_height: probe.ray_height,
            ground_ray_distance: probe.max_distance,
        }
    }
}

/// Rotation defaults (degrees)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RotationConfig {
    /// Step used by the quick-rotate buttons
    pub quarter_turn: f32,
    pub random_min: Vec3,
    pub random_max: Vec3,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            quarter_turn: 90.0,
            random_min: Vec3::ZERO,
            random_max: Vec3::new(0.0, 360.0, 0.0),
        }
    }
}

/// Measurement overlay preferences
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeasurementConfig {
    pub show_distance_gizmos: bool,
    pub max_connections: usize,
    /// Objects with a smaller bounds size are left out of bounds statistics
    pub size_epsilon: f32,
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self {
            show_distance_gizmos: false,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            size_epsilon: DEFAULT_SIZE_EPSILON,
        }
    }
}

/// Complete manipulator configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ManipulatorConfig {
    /// Configuration format version
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub arrangement: ArrangementConfig,
    #[serde(default)]
    pub snap: SnapConfig,
    #[serde(default)]
    pub rotation: RotationConfig,
    #[serde(default)]
    pub measurement: MeasurementConfig,
}

impl ManipulatorConfig {
    /// Current configuration version
    pub const CURRENT_VERSION: u32 = 1;

    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            ..Default::default()
        }
    }

    /// Ground ray settings for snap-to-ground
    pub fn ground_probe(&self) -> GroundProbe {
        GroundProbe {
            ray_height: self.snap.ground_ray_height,
            max_distance: self.snap.ground_ray_distance,
        }
    }
}
