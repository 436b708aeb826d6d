//! Manipulation commands
//!
//! A [`Command`] is an immutable description of one operation and its
//! parameters. The engine previews and commits commands; hosts build them
//! from UI input (or from [`ManipulatorConfig`] presets).

use glam::Vec3;
use manip_core::ops::{self, GroundProbe, ManipError, ManipResult, require_selection};
use manip_core::{
    AlignTarget, Axis, ObjectId, Raycaster, SceneGraph, Selection, SnapDirection, aggregate,
    compute_bounds,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::ManipulatorConfig;

/// A manipulation command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    // Positioning
    SetPosition { position: Vec3 },
    CenterObjects,
    MoveToOrigin,

    // Rotation (Euler degrees)
    SetRotation { euler: Vec3 },
    ResetRotation,
    AddRotation { euler_delta: Vec3 },
    RandomizeRotation { min: Vec3, max: Vec3 },

    // Alignment
    Align { axis: Axis, target: AlignTarget },

    // Arrangement
    ArrangeInLine { direction: Vec3, spacing: f32 },
    ArrangeInGrid { spacing: Vec3 },
    ArrangeInCircle { radius: f32 },
    ArrangeRandomly { range: f32 },

    // Snapping
    SnapToGrid { grid: f32 },
    SnapToGround { align_to_normal: bool },
    SnapToBounds { direction: SnapDirection },
    StackObjects { padding: f32 },

    // Utilities
    Duplicate,
    Delete,
    Group,
}

impl Command {
    /// Label recorded in undo history
    pub fn description(&self) -> &'static str {
        match self {
            Command::SetPosition { .. } => "Set Position",
            Command::CenterObjects => "Center Objects",
            Command::MoveToOrigin => "Move to Origin",
            Command::SetRotation { .. } => "Set Rotation",
            Command::ResetRotation => "Reset Rotation",
            Command::AddRotation { .. } => "Add Rotation",
            Command::RandomizeRotation { .. } => "Randomize Rotation",
            Command::Align { .. } => "Align Objects",
            Command::ArrangeInLine { .. } => "Arrange in Line",
            Command::ArrangeInGrid { .. } => "Arrange in Grid",
            Command::ArrangeInCircle { .. } => "Arrange in Circle",
            Command::ArrangeRandomly { .. } => "Arrange Randomly",
            Command::SnapToGrid { .. } => "Snap to Grid",
            Command::SnapToGround { .. } => "Snap to Ground",
            Command::SnapToBounds { .. } => "Snap to Selection",
            Command::StackObjects { .. } => "Stack Objects",
            Command::Duplicate => ops::DUPLICATE_LABEL,
            Command::Delete => ops::DELETE_LABEL,
            Command::Group => ops::GROUP_LABEL,
        }
    }

    /// Smallest selection the command does anything with
    pub fn min_selection(&self) -> usize {
        match self {
            Command::Align { .. }
            | Command::SnapToBounds { .. }
            | Command::StackObjects { .. }
            | Command::Group => 2,
            _ => 1,
        }
    }

    /// Utilities edit the hierarchy and can only be committed
    pub fn is_previewable(&self) -> bool {
        !matches!(self, Command::Duplicate | Command::Delete | Command::Group)
    }

    /// Check selection size and parameters without touching the scene
    pub fn validate(&self, selection: &Selection) -> ManipResult<()> {
        require_selection(selection, self.min_selection())?;

        match self {
            Command::SetPosition { position: v }
            | Command::SetRotation { euler: v }
            | Command::AddRotation { euler_delta: v }
            | Command::ArrangeInGrid { spacing: v } => finite_vec("vector", *v),
            Command::RandomizeRotation { min, max } => {
                finite_vec("min", *min)?;
                finite_vec("max", *max)
            }
            Command::ArrangeInLine { direction, spacing } => {
                finite_vec("direction", *direction)?;
                finite("spacing", *spacing)
            }
            Command::ArrangeInCircle { radius } => finite("radius", *radius),
            Command::ArrangeRandomly { range } => finite("range", *range),
            Command::SnapToGrid { grid } => {
                if *grid > 0.0 && grid.is_finite() {
                    Ok(())
                } else {
                    Err(ManipError::InvalidParameter(format!(
                        "grid size must be positive, got {grid}"
                    )))
                }
            }
            Command::StackObjects { padding } => {
                if *padding >= 0.0 && padding.is_finite() {
                    Ok(())
                } else {
                    Err(ManipError::InvalidParameter(format!(
                        "stack padding must be zero or positive, got {padding}"
                    )))
                }
            }
            _ => Ok(()),
        }
    }

    /// Check that the objects the command measures have visual extent.
    ///
    /// Only commands that place bounds against other bounds can fail here.
    pub fn check_geometry<S: SceneGraph + ?Sized>(
        &self,
        scene: &S,
        selection: &Selection,
    ) -> ManipResult<()> {
        let degenerate = match self {
            Command::Align { .. } => {
                aggregate(selection.iter().map(|id| compute_bounds(scene, id))).is_degenerate()
            }
            Command::SnapToBounds { .. } | Command::StackObjects { .. } => selection
                .first()
                .is_none_or(|first| compute_bounds(scene, first).is_degenerate()),
            _ => false,
        };

        if degenerate {
            Err(ManipError::DegenerateGeometry)
        } else {
            Ok(())
        }
    }

    /// Objects whose transforms the command writes
    pub fn affected(&self, selection: &Selection) -> Vec<ObjectId> {
        match self {
            Command::SnapToBounds { .. } | Command::StackObjects { .. } => {
                selection.rest().to_vec()
            }
            _ => selection.as_slice().to_vec(),
        }
    }

    /// Run a transform command against the live scene.
    ///
    /// Utilities are rejected with [`ManipError::NotPreviewable`]; they go
    /// through the commit path instead.
    pub fn apply_transform<S, R>(
        &self,
        scene: &mut S,
        selection: &Selection,
        rng: &mut R,
        probe: GroundProbe,
    ) -> ManipResult<usize>
    where
        S: SceneGraph + Raycaster + ?Sized,
        R: Rng,
    {
        match self {
            Command::SetPosition { position } => ops::set_position(scene, selection, *position),
            Command::CenterObjects => ops::center_objects(scene, selection),
            Command::MoveToOrigin => ops::move_to_origin(scene, selection),
            Command::SetRotation { euler } => ops::set_rotation(scene, selection, *euler),
            Command::ResetRotation => ops::reset_rotation(scene, selection),
            Command::AddRotation { euler_delta } => ops::add_rotation(scene, selection, *euler_delta),
            Command::RandomizeRotation { min, max } => {
                ops::randomize_rotation(scene, selection, *min, *max, rng)
            }
            Command::Align { axis, target } => ops::align_objects(scene, selection, *axis, *target),
            Command::ArrangeInLine { direction, spacing } => {
                ops::arrange_in_line(scene, selection, *direction, *spacing)
            }
            Command::ArrangeInGrid { spacing } => ops::arrange_in_grid(scene, selection, *spacing),
            Command::ArrangeInCircle { radius } => ops::arrange_in_circle(scene, selection, *radius),
            Command::ArrangeRandomly { range } => {
                ops::arrange_randomly(scene, selection, *range, rng)
            }
            Command::SnapToGrid { grid } => ops::snap_to_grid(scene, selection, *grid),
            Command::SnapToGround { align_to_normal } => {
                ops::snap_to_ground(scene, selection, *align_to_normal, probe)
            }
            Command::SnapToBounds { direction } => ops::snap_to_bounds(scene, selection, *direction),
            Command::StackObjects { padding } => ops::stack_objects(scene, selection, *padding),
            Command::Duplicate | Command::Delete | Command::Group => {
                Err(ManipError::NotPreviewable(self.description()))
            }
        }
    }

    // Presets built from configured defaults

    /// Line along +X using the configured spacing
    pub fn arrange_in_line(config: &ManipulatorConfig) -> Self {
        Command::ArrangeInLine {
            direction: Vec3::X,
            spacing: config.arrangement.spacing.x,
        }
    }

    pub fn arrange_in_grid(config: &ManipulatorConfig) -> Self {
        let spacing = config.arrangement.spacing;
        // A line spacing has no Z step; reuse X so rows do not overlap
        let z = if spacing.z > 0.0 { spacing.z } else { spacing.x };
        Command::ArrangeInGrid {
            spacing: Vec3::new(spacing.x, 0.0, z),
        }
    }

    /// Circle whose radius is the configured spacing magnitude
    pub fn arrange_in_circle(config: &ManipulatorConfig) -> Self {
        Command::ArrangeInCircle {
            radius: config.arrangement.spacing.length(),
        }
    }

    pub fn arrange_randomly(config: &ManipulatorConfig) -> Self {
        Command::ArrangeRandomly {
            range: config.arrangement.random_range,
        }
    }

    pub fn snap_to_grid(config: &ManipulatorConfig) -> Self {
        Command::SnapToGrid {
            grid: config.snap.grid_size,
        }
    }

    pub fn stack_objects(config: &ManipulatorConfig) -> Self {
        Command::StackObjects {
            padding: config.snap.stack_padding,
        }
    }

    pub fn randomize_rotation(config: &ManipulatorConfig) -> Self {
        Command::RandomizeRotation {
            min: config.rotation.random_min,
            max: config.rotation.random_max,
        }
    }

    /// Quarter turn about a world axis; negative turns go the other way
    pub fn quarter_turn(config: &ManipulatorConfig, axis: Axis, negative: bool) -> Self {
        let step = if negative {
            -config.rotation.quarter_turn
        } else {
            config.rotation.quarter_turn
        };
        Command::AddRotation {
            euler_delta: axis.unit() * step,
        }
    }
}

fn finite(name: &str, value: f32) -> ManipResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ManipError::InvalidParameter(format!("{name} must be finite")))
    }
}

fn finite_vec(name: &str, value: Vec3) -> ManipResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ManipError::InvalidParameter(format!("{name} must be finite")))
    }
}
