use crate::mesh::Slope;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Frame axis for directional atlases.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FrameLayout {
    /// Horizontal when `|width| >= |height|`, vertical otherwise.
    #[default]
    Auto,
    Horizontal,
    Vertical,
}

impl FromStr for FrameLayout {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "horizontal" | "h" => Ok(Self::Horizontal),
            "vertical" | "v" => Ok(Self::Vertical),
            _ => Err(()),
        }
    }
}

/// Which component of a diagonal survives in a 4-directional atlas.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CardinalPriority {
    /// `up_left` -> `up`, `down_right` -> `down`.
    #[default]
    VerticalFirst,
    /// `up_left` -> `left`, `down_right` -> `right`.
    HorizontalFirst,
}

impl FromStr for CardinalPriority {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vertical" | "vertical_first" => Ok(Self::VerticalFirst),
            "horizontal" | "horizontal_first" => Ok(Self::HorizontalFirst),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MeshConfig {
    /// Vertices reserved by a fresh builder.
    #[serde(default = "default_capacity")]
    pub initial_capacity: usize,
    /// Slope used for tiles that don't specify one.
    #[serde(default)]
    pub default_slope: Slope,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            initial_capacity: default_capacity(),
            default_slope: Slope::default(),
        }
    }
}

/// Solver and mesh configuration.
/// Key notes:
///   - `layout` decides how directional atlases are sliced (auto-detect or forced axis)
///   - `priority` decides which cardinal a diagonal collapses to in 4-directional atlases
///   - `mesh` holds staging capacity and the slope applied to tiles that don't carry one
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct SolverConfig {
    #[serde(default)]
    pub layout: FrameLayout,
    #[serde(default)]
    pub priority: CardinalPriority,
    #[serde(default)]
    pub mesh: MeshConfig,
    /// Build scene layers in parallel when feature "parallel" is on.
    #[serde(default)]
    pub parallel: bool,
}

impl SolverConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if:
    /// - A slope factor is NaN or infinite
    /// - A z bound is NaN, or `z_min > z_max`
    pub fn validate(&self) -> crate::error::Result<()> {
        self.mesh.default_slope.validate()
    }
}

fn default_capacity() -> usize {
    256
}

/// Builder for `SolverConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct SolverConfigBuilder {
    cfg: SolverConfig,
}

impl SolverConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: SolverConfig::default(),
        }
    }
    pub fn layout(mut self, v: FrameLayout) -> Self {
        self.cfg.layout = v;
        self
    }
    pub fn priority(mut self, v: CardinalPriority) -> Self {
        self.cfg.priority = v;
        self
    }
    pub fn initial_capacity(mut self, v: usize) -> Self {
        self.cfg.mesh.initial_capacity = v;
        self
    }
    pub fn default_slope(mut self, v: Slope) -> Self {
        self.cfg.mesh.default_slope = v;
        self
    }
    pub fn parallel(mut self, v: bool) -> Self {
        self.cfg.parallel = v;
        self
    }
    pub fn build(self) -> SolverConfig {
        self.cfg
    }
}

impl SolverConfig {
    /// Create a fluent builder for `SolverConfig`.
    pub fn builder() -> SolverConfigBuilder {
        SolverConfigBuilder::new()
    }
}
