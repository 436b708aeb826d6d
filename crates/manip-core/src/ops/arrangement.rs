//! Layout of a selection around its first member

use glam::Vec3;
use rand::Rng;

use super::rotation::sample;
use super::{ManipResult, require_selection, write_position};
use crate::scene::SceneGraph;
use crate::selection::Selection;

/// Position of the first member, the anchor every arrangement is laid out from
fn anchor<S: SceneGraph + ?Sized>(scene: &S, selection: &Selection) -> Option<Vec3> {
    let first = selection.first()?;
    let anchor = scene.position(first);
    if anchor.is_none() {
        tracing::warn!("Arrangement anchor {} is no longer in the scene", first);
    }
    anchor
}

/// Write `layout(i)` relative to the anchor for each member `i`
fn place<S, F>(scene: &mut S, selection: &Selection, mut layout: F) -> ManipResult<usize>
where
    S: SceneGraph + ?Sized,
    F: FnMut(usize) -> Vec3,
{
    require_selection(selection, 1)?;
    let Some(anchor) = anchor(scene, selection) else {
        return Ok(0);
    };

    let mut written = 0;
    for (i, id) in selection.iter().enumerate() {
        if write_position(scene, id, anchor + layout(i)) {
            written += 1;
        }
    }
    Ok(written)
}

/// Member `i` goes to `anchor + direction * spacing * i`
pub fn arrange_in_line<S: SceneGraph + ?Sized>(
    scene: &mut S,
    selection: &Selection,
    direction: Vec3,
    spacing: f32,
) -> ManipResult<usize> {
    place(scene, selection, |i| direction * spacing * i as f32)
}

/// Row-major square grid on the XZ plane, `ceil(sqrt(count))` columns wide
pub fn arrange_in_grid<S: SceneGraph + ?Sized>(
    scene: &mut S,
    selection: &Selection,
    spacing: Vec3,
) -> ManipResult<usize> {
    let columns = grid_columns(selection.len());
    place(scene, selection, |i| {
        let (col, row) = (i % columns, i / columns);
        Vec3::new(spacing.x * col as f32, 0.0, spacing.z * row as f32)
    })
}

fn grid_columns(count: usize) -> usize {
    ((count as f64).sqrt().ceil() as usize).max(1)
}

/// Evenly spaced ring on the XZ plane, starting on +X
pub fn arrange_in_circle<S: SceneGraph + ?Sized>(
    scene: &mut S,
    selection: &Selection,
    radius: f32,
) -> ManipResult<usize> {
    let step = 360.0 / selection.len().max(1) as f32;
    place(scene, selection, |i| {
        let angle = (step * i as f32).to_radians();
        Vec3::new(angle.cos(), 0.0, angle.sin()) * radius
    })
}

/// Scatter members around the anchor.
///
/// X and Z are drawn from `[-range, range]`, Y from half that. A range of
/// zero or less puts every member on the anchor.
pub fn arrange_randomly<S: SceneGraph + ?Sized, R: Rng>(
    scene: &mut S,
    selection: &Selection,
    range: f32,
    rng: &mut R,
) -> ManipResult<usize> {
    let r = range.max(0.0);
    place(scene, selection, |_| {
        Vec3::new(
            sample(rng, -r, r),
            sample(rng, -r * 0.5, r * 0.5),
            sample(rng, -r, r),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::ManipError;
    use crate::scene::MemoryScene;
    use crate::types::ObjectId;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn scattered(count: usize) -> (MemoryScene, Vec<ObjectId>) {
        let mut scene = MemoryScene::new();
        let ids = (0..count)
            .map(|i| {
                let p = Vec3::new(i as f32 * 3.0 - 1.0, i as f32, 7.0 - i as f32);
                let p = if i == 0 { Vec3::ZERO } else { p };
                scene.spawn_box(&format!("Obj{i}"), p, Vec3::ONE)
            })
            .collect();
        (scene, ids)
    }

    fn assert_positions(scene: &MemoryScene, ids: &[ObjectId], expected: &[Vec3]) {
        for (id, want) in ids.iter().zip(expected) {
            let got = scene.position(*id).unwrap();
            assert!(got.distance(*want) < 1e-5, "expected {want}, got {got}");
        }
    }

    #[test]
    fn test_arrange_in_line() {
        let (mut scene, ids) = scattered(3);
        scene.set_position(ids[0], Vec3::new(1.0, 2.0, 3.0));

        arrange_in_line(&mut scene, &Selection::from_ids(ids.clone()), Vec3::X, 2.0).unwrap();
        assert_positions(
            &scene,
            &ids,
            &[
                Vec3::new(1.0, 2.0, 3.0),
                Vec3::new(3.0, 2.0, 3.0),
                Vec3::new(5.0, 2.0, 3.0),
            ],
        );
    }

    #[test]
    fn test_arrange_in_grid() {
        let (mut scene, ids) = scattered(4);

        arrange_in_grid(
            &mut scene,
            &Selection::from_ids(ids.clone()),
            Vec3::new(2.0, 0.0, 2.0),
        )
        .unwrap();
        assert_positions(
            &scene,
            &ids,
            &[
                Vec3::ZERO,
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 2.0),
                Vec3::new(2.0, 0.0, 2.0),
            ],
        );
    }

    #[test]
    fn test_grid_columns() {
        assert_eq!(grid_columns(0), 1);
        assert_eq!(grid_columns(1), 1);
        assert_eq!(grid_columns(4), 2);
        assert_eq!(grid_columns(5), 3);
        assert_eq!(grid_columns(10), 4);
    }

    #[test]
    fn test_arrange_in_circle() {
        let (mut scene, ids) = scattered(4);

        arrange_in_circle(&mut scene, &Selection::from_ids(ids.clone()), 1.0).unwrap();
        assert_positions(
            &scene,
            &ids,
            &[
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(-1.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, -1.0),
            ],
        );
    }

    #[test]
    fn test_arrange_in_circle_single() {
        let (mut scene, ids) = scattered(1);
        arrange_in_circle(&mut scene, &Selection::from_ids(ids.clone()), 3.0).unwrap();
        assert_positions(&scene, &ids, &[Vec3::new(3.0, 0.0, 0.0)]);
    }

    #[test]
    fn test_arrange_randomly_stays_in_range() {
        let (mut scene, ids) = scattered(10);
        let mut rng = StdRng::seed_from_u64(42);

        arrange_randomly(&mut scene, &Selection::from_ids(ids.clone()), 4.0, &mut rng).unwrap();
        for id in &ids {
            let p = scene.position(*id).unwrap();
            assert!(p.x.abs() <= 4.0 && p.z.abs() <= 4.0);
            assert!(p.y.abs() <= 2.0);
        }
    }

    #[test]
    fn test_arrange_randomly_zero_range() {
        let (mut scene, ids) = scattered(3);
        let mut rng = StdRng::seed_from_u64(1);

        arrange_randomly(&mut scene, &Selection::from_ids(ids.clone()), 0.0, &mut rng).unwrap();
        for id in &ids {
            assert_relative_eq!(scene.position(*id).unwrap().length(), 0.0);
        }
    }

    #[test]
    fn test_stale_anchor_moves_nothing() {
        let (mut scene, ids) = scattered(2);
        let selection = Selection::from_ids([ObjectId::new(), ids[1]]);
        let before = scene.position(ids[1]);

        assert_eq!(arrange_in_line(&mut scene, &selection, Vec3::X, 1.0), Ok(0));
        assert_eq!(scene.position(ids[1]), before);
    }

    #[test]
    fn test_empty_selection() {
        let mut scene = MemoryScene::new();
        assert!(matches!(
            arrange_in_grid(&mut scene, &Selection::new(), Vec3::ONE),
            Err(ManipError::InsufficientSelection { .. })
        ));
    }
}
