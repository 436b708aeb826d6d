//! Axis, alignment target and snap direction enums

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::bounds::Bounds;

/// World axis. Y is the height axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Read this axis' component of a vector
    pub fn component(self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    /// Copy of `v` with this axis' component replaced
    pub fn with_component(self, v: Vec3, value: f32) -> Vec3 {
        match self {
            Axis::X => Vec3::new(value, v.y, v.z),
            Axis::Y => Vec3::new(v.x, value, v.z),
            Axis::Z => Vec3::new(v.x, v.y, value),
        }
    }

    /// Unit vector pointing along the positive axis
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

/// Which part of a bounding box alignment lines up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlignTarget {
    Min,
    Center,
    Max,
}

impl AlignTarget {
    /// The coordinate of this target on `axis` for the given bounds
    pub fn pick(self, bounds: &Bounds, axis: Axis) -> f32 {
        match self {
            AlignTarget::Min => axis.component(bounds.min()),
            AlignTarget::Center => axis.component(bounds.center()),
            AlignTarget::Max => axis.component(bounds.max()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AlignTarget::Min => "Min",
            AlignTarget::Center => "Center",
            AlignTarget::Max => "Max",
        }
    }
}

/// Side of a reference object to snap against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnapDirection {
    Down,
    Up,
    Left,
    Right,
    Forward,
    Back,
}

impl SnapDirection {
    pub const ALL: [SnapDirection; 6] = [
        SnapDirection::Down,
        SnapDirection::Up,
        SnapDirection::Left,
        SnapDirection::Right,
        SnapDirection::Forward,
        SnapDirection::Back,
    ];

    /// The single axis a snap in this direction moves along
    pub fn axis(self) -> Axis {
        match self {
            SnapDirection::Down | SnapDirection::Up => Axis::Y,
            SnapDirection::Left | SnapDirection::Right => Axis::X,
            SnapDirection::Forward | SnapDirection::Back => Axis::Z,
        }
    }

    /// True when the direction points toward the positive end of its axis
    pub fn is_positive(self) -> bool {
        matches!(
            self,
            SnapDirection::Up | SnapDirection::Right | SnapDirection::Forward
        )
    }

    /// World-space unit vector of the direction
    pub fn vector(self) -> Vec3 {
        if self.is_positive() {
            self.axis().unit()
        } else {
            -self.axis().unit()
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SnapDirection::Down => "Down",
            SnapDirection::Up => "Up",
            SnapDirection::Left => "Left",
            SnapDirection::Right => "Right",
            SnapDirection::Forward => "Forward",
            SnapDirection::Back => "Back",
        }
    }
}
