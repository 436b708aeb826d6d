//! In-memory scene graph.
//!
//! Objects store world transforms directly. Writing an object's transform
//! applies the same rigid motion to all of its descendants, so moving a
//! group moves everything under it.

use std::collections::HashMap;

use glam::{Quat, Vec3};

use super::{RayHit, Raycaster, SceneError, SceneGraph, SceneHierarchy};
use crate::bounds::Bounds;
use crate::types::{Axis, ObjectId, WorldTransform};

/// An object stored in a [`MemoryScene`]
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub transform: WorldTransform,
    /// Visual sub-parts in object-local space
    pub parts: Vec<Bounds>,
    pub parent: Option<ObjectId>,
}

impl SceneObject {
    /// Create an object at the origin with no visual parts
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ObjectId::new(),
            name: name.into(),
            transform: WorldTransform::IDENTITY,
            parts: Vec::new(),
            parent: None,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.transform.rotation = rotation;
        self
    }

    /// Add a visual sub-part given in object-local space
    pub fn with_part(mut self, local: Bounds) -> Self {
        self.parts.push(local);
        self
    }

    /// Add a box sub-part of `size` centered on the pivot
    pub fn with_box(self, size: Vec3) -> Self {
        self.with_part(Bounds::from_center_size(Vec3::ZERO, size))
    }

    /// World-space bounds of this object's own sub-parts
    pub fn world_parts(&self) -> Vec<Bounds> {
        let matrix = self.transform.to_mat4();
        self.parts.iter().map(|b| b.transform(&matrix)).collect()
    }
}

/// Infinite plane that rays can hit, e.g. terrain under the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundPlane {
    pub point: Vec3,
    pub normal: Vec3,
}

impl GroundPlane {
    /// Horizontal plane at the given height
    pub fn horizontal(height: f32) -> Self {
        Self {
            point: Vec3::new(0.0, height, 0.0),
            normal: Vec3::Y,
        }
    }
}

/// Scene graph held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryScene {
    objects: HashMap<ObjectId, SceneObject>,
    ground: Option<GroundPlane>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ground_plane(mut self, plane: GroundPlane) -> Self {
        self.ground = Some(plane);
        self
    }

    /// Adds an object to the scene.
    pub fn add_object(&mut self, object: SceneObject) -> ObjectId {
        let id = object.id;
        self.objects.insert(id, object);
        id
    }

    /// Add a box-shaped object of `size` at `position`
    pub fn spawn_box(&mut self, name: &str, position: Vec3, size: Vec3) -> ObjectId {
        self.add_object(SceneObject::new(name).with_position(position).with_box(size))
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    pub fn get_object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.values()
    }

    /// Direct children of an object
    pub fn children(&self, id: ObjectId) -> Vec<ObjectId> {
        self.objects
            .values()
            .filter(|o| o.parent == Some(id))
            .map(|o| o.id)
            .collect()
    }

    /// The object itself followed by all of its descendants
    pub fn subtree(&self, id: ObjectId) -> Vec<ObjectId> {
        if !self.objects.contains_key(&id) {
            return Vec::new();
        }

        let mut collected = vec![id];
        let mut i = 0;
        while i < collected.len() {
            let current = collected[i];
            collected.extend(self.children(current));
            i += 1;
        }
        collected
    }

    /// Check if `ancestor` is `id` or one of its parents
    pub fn is_in_subtree_of(&self, id: ObjectId, ancestor: ObjectId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.objects.get(&c).and_then(|o| o.parent);
        }
        false
    }

    fn intersect_plane(&self, origin: Vec3, dir: Vec3, max_distance: f32) -> Option<RayHit> {
        let plane = self.ground?;
        let normal = plane.normal.try_normalize()?;
        let denom = normal.dot(dir);
        if denom.abs() < RAY_EPSILON {
            return None;
        }

        let t = normal.dot(plane.point - origin) / denom;
        if !(0.0..=max_distance).contains(&t) {
            return None;
        }

        Some(RayHit {
            point: origin + dir * t,
            normal: if denom < 0.0 { normal } else { -normal },
            distance: t,
            object: None,
        })
    }
}

impl SceneGraph for MemoryScene {
    fn world_transform(&self, id: ObjectId) -> Option<WorldTransform> {
        self.objects.get(&id).map(|o| o.transform)
    }

    fn set_world_transform(&mut self, id: ObjectId, transform: WorldTransform) -> bool {
        let Some(old) = self.objects.get(&id).map(|o| o.transform) else {
            return false;
        };

        let turn = transform.rotation * old.rotation.inverse();
        for member in self.subtree(id).into_iter().skip(1) {
            if let Some(object) = self.objects.get_mut(&member) {
                let t = &mut object.transform;
                t.position = transform.position + turn * (t.position - old.position);
                t.rotation = (turn * t.rotation).normalize();
            }
        }

        if let Some(object) = self.objects.get_mut(&id) {
            object.transform = transform;
        }
        true
    }

    fn parent(&self, id: ObjectId) -> Option<ObjectId> {
        self.objects.get(&id).and_then(|o| o.parent)
    }

    fn visual_bounds(&self, id: ObjectId) -> Vec<Bounds> {
        self.subtree(id)
            .into_iter()
            .filter_map(|member| self.objects.get(&member))
            .flat_map(|o| o.world_parts())
            .collect()
    }
}

impl Raycaster for MemoryScene {
    fn cast_downward(&self, origin: Vec3, max_distance: f32, exclude: ObjectId) -> Option<RayHit> {
        let dir = Vec3::NEG_Y;
        let mut closest = self.intersect_plane(origin, dir, max_distance);

        for object in self.objects.values() {
            if self.is_in_subtree_of(object.id, exclude) {
                continue;
            }

            for part in object.world_parts() {
                let Some((t, normal)) = ray_aabb_intersection(origin, dir, part.min(), part.max())
                else {
                    continue;
                };
                if t > max_distance {
                    continue;
                }
                if closest.is_none_or(|hit| t < hit.distance) {
                    closest = Some(RayHit {
                        point: origin + dir * t,
                        normal,
                        distance: t,
                        object: Some(object.id),
                    });
                }
            }
        }

        closest
    }
}

impl SceneHierarchy for MemoryScene {
    fn name(&self, id: ObjectId) -> Option<String> {
        self.objects.get(&id).map(|o| o.name.clone())
    }

    fn duplicate(&mut self, id: ObjectId, name: &str) -> Result<ObjectId, SceneError> {
        let source = self
            .objects
            .get(&id)
            .ok_or(SceneError::ObjectNotFound(id))?
            .clone();

        let copy = SceneObject {
            id: ObjectId::new(),
            name: name.to_string(),
            parent: None,
            ..source
        };
        let copy_id = self.add_object(copy);

        // Children keep their own names under the copy
        for child in self.children(id) {
            let child_name = self.name(child).unwrap_or_default();
            let child_copy = self.duplicate(child, &child_name)?;
            self.set_parent(child_copy, Some(copy_id))?;
        }

        Ok(copy_id)
    }

    fn destroy(&mut self, id: ObjectId) -> Result<(), SceneError> {
        if !self.objects.contains_key(&id) {
            return Err(SceneError::ObjectNotFound(id));
        }

        for member in self.subtree(id) {
            self.objects.remove(&member);
        }
        Ok(())
    }

    fn create_empty(&mut self, name: &str, transform: WorldTransform) -> ObjectId {
        let mut object = SceneObject::new(name);
        object.transform = transform;
        self.add_object(object)
    }

    fn set_parent(&mut self, child: ObjectId, parent: Option<ObjectId>) -> Result<(), SceneError> {
        if !self.objects.contains_key(&child) {
            return Err(SceneError::ObjectNotFound(child));
        }
        if let Some(parent_id) = parent {
            if !self.objects.contains_key(&parent_id) {
                return Err(SceneError::ObjectNotFound(parent_id));
            }
            if self.is_in_subtree_of(parent_id, child) {
                return Err(SceneError::WouldCreateCycle);
            }
        }

        if let Some(object) = self.objects.get_mut(&child) {
            object.parent = parent;
        }
        Ok(())
    }
}

const RAY_EPSILON: f32 = 1e-6;

/// Ray-AABB (Axis-Aligned Bounding Box) intersection test.
///
/// Returns the entry distance and the normal of the entered face. Rays that
/// start inside the box do not hit it.
fn ray_aabb_intersection(
    ray_origin: Vec3,
    ray_dir: Vec3,
    bbox_min: Vec3,
    bbox_max: Vec3,
) -> Option<(f32, Vec3)> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut normal = Vec3::ZERO;

    for axis in Axis::ALL {
        let o = axis.component(ray_origin);
        let d = axis.component(ray_dir);
        let (lo, hi) = (axis.component(bbox_min), axis.component(bbox_max));

        if d.abs() < RAY_EPSILON {
            // Parallel to this slab
            if o < lo || o > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let (mut t0, mut t1) = ((lo - o) * inv, (hi - o) * inv);
        let mut face = -axis.unit();
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
            face = axis.unit();
        }

        if t0 > t_enter {
            t_enter = t0;
            normal = face;
        }
        t_exit = t_exit.min(t1);

        if t_enter > t_exit {
            return None;
        }
    }

    if t_enter < 0.0 {
        return None;
    }

    Some((t_enter, normal))
}
