//! Distance and size statistics for a selection

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::bounds::{Bounds, compute_bounds};
use crate::scene::SceneGraph;
use crate::selection::Selection;

/// Objects whose bounds are smaller than this are left out of bounds stats
pub const DEFAULT_SIZE_EPSILON: f32 = 0.001;

/// Most distance connections reported for one selection
pub const DEFAULT_MAX_CONNECTIONS: usize = 15;

/// Size statistics of the combined bounds of a selection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundsStats {
    pub size: Vec3,
    pub volume: f32,
    pub surface_area: f32,
}

impl From<Bounds> for BoundsStats {
    fn from(bounds: Bounds) -> Self {
        Self {
            size: bounds.size(),
            volume: bounds.volume(),
            surface_area: bounds.surface_area(),
        }
    }
}

/// Measurements of the current selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Measurement {
    TooFewObjects,
    Pair {
        distance: f32,
    },
    /// Gaps between consecutive members, in selection order
    Chain {
        count: usize,
        total: f32,
        /// First to last member
        direct: f32,
        average: f32,
        min: f32,
        max: f32,
        bounds: Option<BoundsStats>,
    },
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measurement::TooFewObjects => write!(f, "Select at least 2 objects."),
            Measurement::Pair { distance } => write!(f, "Distance: {distance:.2}m"),
            Measurement::Chain {
                count,
                total,
                direct,
                average,
                min,
                max,
                bounds: Some(stats),
            } => {
                writeln!(f, "Objects: {count}")?;
                writeln!(f, "Chain: {total:.2}m")?;
                writeln!(f, "Direct: {direct:.2}m")?;
                writeln!(f, "Avg Gap: {average:.2}m")?;
                writeln!(f, "Range: {min:.2}m - {max:.2}m")?;
                writeln!(
                    f,
                    "Bounds: {:.1} × {:.1} × {:.1}",
                    stats.size.x, stats.size.y, stats.size.z
                )?;
                writeln!(f, "Volume: {:.2}m³", stats.volume)?;
                write!(f, "Surface: {:.2}m²", stats.surface_area)
            }
            Measurement::Chain {
                count,
                total,
                average,
                min,
                max,
                bounds: None,
                ..
            } => {
                writeln!(f, "Objects: {count}")?;
                writeln!(f, "Chain Distance: {total:.2}m")?;
                writeln!(f, "Average: {average:.2}m")?;
                write!(f, "Range: {min:.2}m - {max:.2}m")
            }
        }
    }
}

/// Measure distances between selected pivots and the size of their bounds.
///
/// Stale handles are ignored; the remaining live objects are measured in
/// selection order.
pub fn measure<S: SceneGraph + ?Sized>(
    scene: &S,
    selection: &Selection,
    size_epsilon: f32,
) -> Measurement {
    let live: Vec<_> = selection
        .iter()
        .filter_map(|id| scene.position(id).map(|p| (id, p)))
        .collect();
    let positions: Vec<Vec3> = live.iter().map(|(_, p)| *p).collect();

    match positions.as_slice() {
        [] | [_] => Measurement::TooFewObjects,
        [a, b] => Measurement::Pair {
            distance: a.distance(*b),
        },
        [first, .., last] => {
            let gaps: Vec<f32> = positions.windows(2).map(|w| w[0].distance(w[1])).collect();
            let total: f32 = gaps.iter().sum();
            let min = gaps.iter().copied().fold(f32::INFINITY, f32::min);
            let max = gaps.iter().copied().fold(f32::NEG_INFINITY, f32::max);

            let sized: Vec<Bounds> = live
                .iter()
                .map(|(id, _)| compute_bounds(scene, *id))
                .filter(|b| !b.is_degenerate() && b.size().length() > size_epsilon)
                .collect();
            let bounds = sized
                .into_iter()
                .reduce(|acc, b| acc.union(&b))
                .map(BoundsStats::from);

            Measurement::Chain {
                count: positions.len(),
                total,
                direct: first.distance(*last),
                average: total / gaps.len() as f32,
                min,
                max,
                bounds,
            }
        }
    }
}

/// A line between two consecutive selected objects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceConnection {
    pub start: Vec3,
    pub end: Vec3,
    pub distance: f32,
}

impl DistanceConnection {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self {
            start,
            end,
            distance: start.distance(end),
        }
    }

    pub fn midpoint(&self) -> Vec3 {
        self.start.lerp(self.end, 0.5)
    }

    /// Unit direction from start to end, zero for coincident points
    pub fn direction(&self) -> Vec3 {
        (self.end - self.start).normalize_or_zero()
    }

    /// Overlay label, e.g. `"3.0m"`
    pub fn label(&self) -> String {
        format!("{:.1}m", self.distance)
    }
}

/// Segments between consecutive selected pivots, at most `max_connections`
pub fn distance_connections<S: SceneGraph + ?Sized>(
    scene: &S,
    selection: &Selection,
    max_connections: usize,
) -> Vec<DistanceConnection> {
    let positions: Vec<Vec3> = selection.iter().filter_map(|id| scene.position(id)).collect();
    positions
        .windows(2)
        .take(max_connections)
        .map(|w| DistanceConnection::new(w[0], w[1]))
        .collect()
}
