//! World-space bounding volumes
//!
//! Bounds are axis-aligned boxes. An object without visual extent gets a
//! *degenerate* bounds anchored at its position; degenerate entries never
//! take part in aggregation.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::scene::SceneGraph;
use crate::types::ObjectId;

/// Axis-aligned bounding box, or a degenerate marker with no extent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    min: Vec3,
    max: Vec3,
    degenerate: bool,
}

impl Bounds {
    /// Create bounds spanning two corners (in any order)
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
            degenerate: false,
        }
    }

    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self::new(center - half, center + half)
    }

    /// Bounds for an object with no visual extent, anchored at `anchor`
    pub fn degenerate(anchor: Vec3) -> Self {
        Self {
            min: anchor,
            max: anchor,
            degenerate: true,
        }
    }

    /// Smallest bounds containing every point, or `None` for no points
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self::new(min, max))
    }

    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    pub fn min(&self) -> Vec3 {
        self.min
    }

    pub fn max(&self) -> Vec3 {
        self.max
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half of the size on every axis
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn volume(&self) -> f32 {
        let s = self.size();
        s.x * s.y * s.z
    }

    pub fn surface_area(&self) -> f32 {
        let s = self.size();
        2.0 * (s.x * s.y + s.y * s.z + s.x * s.z)
    }

    /// Union of two bounds. A degenerate side contributes nothing.
    pub fn union(&self, other: &Bounds) -> Bounds {
        match (self.degenerate, other.degenerate) {
            (true, _) => *other,
            (false, true) => *self,
            (false, false) => Bounds::new(self.min.min(other.min), self.max.max(other.max)),
        }
    }

    /// Axis-aligned bounds of this box after an affine transform
    pub fn transform(&self, matrix: &Mat4) -> Bounds {
        if self.degenerate {
            return Bounds::degenerate(matrix.transform_point3(self.min));
        }

        let (lo, hi) = (self.min, self.max);
        let corners = [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ];

        // Eight corners always produce a box
        Bounds::from_points(corners.iter().map(|c| matrix.transform_point3(*c)))
            .unwrap_or(Bounds::degenerate(matrix.transform_point3(lo)))
    }
}

/// Union of all non-degenerate bounds.
///
/// Returns a degenerate bounds when every entry is degenerate (or there are
/// none); it is anchored at the first entry, or the origin.
pub fn aggregate(bounds: impl IntoIterator<Item = Bounds>) -> Bounds {
    let mut anchor: Option<Vec3> = None;
    let mut result: Option<Bounds> = None;

    for b in bounds {
        anchor.get_or_insert(b.min);
        if b.is_degenerate() {
            continue;
        }
        result = Some(match result {
            Some(current) => current.union(&b),
            None => b,
        });
    }

    result.unwrap_or_else(|| Bounds::degenerate(anchor.unwrap_or(Vec3::ZERO)))
}

/// World-space bounds of a single object from its visual sub-parts.
///
/// Zero-size sub-parts are ignored. Objects without any sized sub-part get
/// degenerate bounds at their position; objects unknown to the scene get
/// degenerate bounds at the origin.
pub fn compute_bounds<S: SceneGraph + ?Sized>(scene: &S, id: ObjectId) -> Bounds {
    let Some(transform) = scene.world_transform(id) else {
        tracing::warn!("Bounds requested for unknown object {}", id);
        return Bounds::degenerate(Vec3::ZERO);
    };

    let merged = aggregate(
        scene
            .visual_bounds(id)
            .into_iter()
            .filter(|b| b.size() != Vec3::ZERO),
    );
    if merged.is_degenerate() {
        Bounds::degenerate(transform.position)
    } else {
        merged
    }
}
