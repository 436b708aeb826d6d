//! The manipulator engine
//!
//! One [`Manipulator`] serves one editing surface. It owns the preview
//! session, the configured defaults and the random source for scatter and
//! random rotation, and is the single entry point hosts call into.

use manip_core::ops::{ManipError, ManipResult};
use manip_core::{
    DistanceConnection, Measurement, SceneHost, Selection, SelectionProvider, UndoRecorder,
    distance_connections, measure,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::command::Command;
use crate::commit::{CommitOutcome, commit};
use crate::config::{ManipulatorConfig, SharedConfig};
use crate::preview::PreviewSession;

pub struct Manipulator {
    preview: PreviewSession,
    config: ManipulatorConfig,
    rng: StdRng,
}

impl Default for Manipulator {
    fn default() -> Self {
        Self::new(ManipulatorConfig::new())
    }
}

impl Manipulator {
    pub fn new(config: ManipulatorConfig) -> Self {
        Self {
            preview: PreviewSession::new(),
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Engine with a fixed random seed, for reproducible results
    pub fn with_seed(config: ManipulatorConfig, seed: u64) -> Self {
        Self {
            preview: PreviewSession::new(),
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Engine using a snapshot of the shared configuration
    pub fn from_shared(config: &SharedConfig) -> Self {
        Self::new(config.read().config().clone())
    }

    pub fn config(&self) -> &ManipulatorConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ManipulatorConfig) {
        self.config = config;
    }

    pub fn is_previewing(&self) -> bool {
        self.preview.is_active()
    }

    /// Session state, for hosts that highlight previewed objects
    pub fn preview_session(&self) -> &PreviewSession {
        &self.preview
    }

    /// Show the result of `command` without recording it.
    ///
    /// Previewed objects are reset to their pre-preview transforms before
    /// the command runs, so consecutive previews replace each other instead
    /// of accumulating. A rejected command shows the baseline while the
    /// session stays open.
    pub fn preview<S: SceneHost + ?Sized>(
        &mut self,
        scene: &mut S,
        selection: &Selection,
        command: &Command,
    ) -> ManipResult<usize> {
        let result = self.try_preview(scene, selection, command);
        if let Err(e) = &result {
            tracing::debug!("Preview of {} skipped: {}", command.description(), e);
            if self.preview.is_active() {
                self.preview.restore_baseline(scene);
            }
        }
        result
    }

    fn try_preview<S: SceneHost + ?Sized>(
        &mut self,
        scene: &mut S,
        selection: &Selection,
        command: &Command,
    ) -> ManipResult<usize> {
        if !command.is_previewable() {
            return Err(ManipError::NotPreviewable(command.description()));
        }
        command.validate(selection)?;
        command.check_geometry(scene, selection)?;

        self.preview.start(scene, selection.as_slice());
        self.preview.restore_baseline(scene);
        command.apply_transform(scene, selection, &mut self.rng, self.config.ground_probe())
    }

    /// Restore everything the preview touched. Does nothing when idle.
    pub fn cancel_preview<S: SceneHost + ?Sized>(&mut self, scene: &mut S) -> usize {
        self.preview.cancel(scene)
    }

    /// Commit `command` through the undo recorder
    pub fn execute<S, U>(
        &mut self,
        scene: &mut S,
        recorder: &mut U,
        selection: &Selection,
        command: &Command,
    ) -> ManipResult<CommitOutcome>
    where
        S: SceneHost + ?Sized,
        U: UndoRecorder + ?Sized,
    {
        let probe = self.config.ground_probe();
        let result = commit(
            &mut self.preview,
            scene,
            recorder,
            selection,
            command,
            &mut self.rng,
            probe,
        );
        if let Err(e) = &result {
            tracing::debug!("{} skipped: {}", command.description(), e);
        }
        result
    }

    /// React to a new host selection: drop any preview and re-measure
    pub fn selection_changed<S: SceneHost + ?Sized>(
        &mut self,
        scene: &mut S,
        selection: &Selection,
    ) -> Measurement {
        self.preview.cancel(scene);
        self.measure(scene, selection)
    }

    /// [`Self::selection_changed`] for the provider's current selection
    pub fn refresh<S, P>(&mut self, scene: &mut S, provider: &P) -> Measurement
    where
        S: SceneHost + ?Sized,
        P: SelectionProvider + ?Sized,
    {
        self.selection_changed(scene, &provider.current_selection())
    }

    pub fn measure<S: SceneHost + ?Sized>(&self, scene: &S, selection: &Selection) -> Measurement {
        measure(scene, selection, self.config.measurement.size_epsilon)
    }

    /// Distance overlay segments; empty while distance gizmos are switched off
    pub fn distance_connections<S: SceneHost + ?Sized>(
        &self,
        scene: &S,
        selection: &Selection,
    ) -> Vec<DistanceConnection> {
        if !self.config.measurement.show_distance_gizmos {
            return Vec::new();
        }
        distance_connections(scene, selection, self.config.measurement.max_connections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigManager;
    use crate::history::MemoryHistory;
    use approx::assert_relative_eq;
    use glam::Vec3;
    use manip_core::{
        AlignTarget, Axis, MemoryScene, ObjectId, SceneGraph, SelectionManager, compute_bounds,
        quat_to_euler_degrees,
    };

    fn scene_with_boxes() -> (MemoryScene, Selection) {
        let mut scene = MemoryScene::new();
        let a = scene.spawn_box("A", Vec3::new(0.5, 0.5, 0.5), Vec3::ONE);
        let b = scene.spawn_box("B", Vec3::new(6.0, 0.5, 0.5), Vec3::new(2.0, 1.0, 1.0));
        let c = scene.spawn_box("C", Vec3::new(-2.0, 3.0, 4.0), Vec3::ONE);
        (scene, Selection::from_ids([a, b, c]))
    }

    fn snapshot(scene: &MemoryScene, selection: &Selection) -> Vec<Option<manip_core::WorldTransform>> {
        selection.iter().map(|id| scene.world_transform(id)).collect()
    }

    #[test]
    fn test_preview_round_trip() {
        let (mut scene, selection) = scene_with_boxes();
        let original = snapshot(&scene, &selection);
        let mut engine = Manipulator::with_seed(ManipulatorConfig::new(), 11);

        engine
            .preview(&mut scene, &selection, &Command::ArrangeInCircle { radius: 4.0 })
            .unwrap();
        engine
            .preview(&mut scene, &selection, &Command::ArrangeRandomly { range: 10.0 })
            .unwrap();
        engine
            .preview(
                &mut scene,
                &selection,
                &Command::AddRotation {
                    euler_delta: Vec3::new(0.0, 45.0, 10.0),
                },
            )
            .unwrap();
        assert!(engine.is_previewing());
        assert_ne!(snapshot(&scene, &selection), original);

        engine.cancel_preview(&mut scene);
        assert_eq!(snapshot(&scene, &selection), original);
        assert!(!engine.is_previewing());
        assert_eq!(engine.cancel_preview(&mut scene), 0);
    }

    #[test]
    fn test_previews_do_not_compound() {
        let (mut scene, selection) = scene_with_boxes();
        let first = selection.first().unwrap();
        let mut engine = Manipulator::default();
        let turn = Command::quarter_turn(engine.config(), Axis::Y, false);

        engine.preview(&mut scene, &selection, &turn).unwrap();
        engine.preview(&mut scene, &selection, &turn).unwrap();

        let euler = quat_to_euler_degrees(scene.rotation(first).unwrap());
        assert_relative_eq!(euler.y, 90.0, epsilon = 1e-3);
    }

    #[test]
    fn test_commit_after_preview_records_original() {
        let (mut scene, selection) = scene_with_boxes();
        let original = snapshot(&scene, &selection);
        let mut engine = Manipulator::default();
        let mut history = MemoryHistory::default();
        let align = Command::Align {
            axis: Axis::X,
            target: AlignTarget::Min,
        };

        engine
            .preview(&mut scene, &selection, &Command::MoveToOrigin)
            .unwrap();
        engine
            .execute(&mut scene, &mut history, &selection, &align)
            .unwrap();

        let entry = history.last().unwrap();
        let recorded: Vec<_> = entry.before.iter().map(|s| Some(s.transform)).collect();
        assert_eq!(recorded, original);
        assert!(!engine.is_previewing());

        // Undo brings back the exact pre-preview layout
        history.undo(&mut scene);
        assert_eq!(snapshot(&scene, &selection), original);
    }

    #[test]
    fn test_rejected_preview_leaves_scene() {
        let (mut scene, selection) = scene_with_boxes();
        let original = snapshot(&scene, &selection);
        let mut engine = Manipulator::default();

        assert_eq!(
            engine.preview(&mut scene, &selection, &Command::Delete),
            Err(ManipError::NotPreviewable("Delete Objects"))
        );
        assert!(
            engine
                .preview(&mut scene, &selection, &Command::SnapToGrid { grid: -1.0 })
                .is_err()
        );
        assert!(!engine.is_previewing());
        assert_eq!(snapshot(&scene, &selection), original);
    }

    #[test]
    fn test_rejected_preview_shows_baseline() {
        let (mut scene, selection) = scene_with_boxes();
        let original = snapshot(&scene, &selection);
        let mut engine = Manipulator::default();

        engine
            .preview(&mut scene, &selection, &Command::MoveToOrigin)
            .unwrap();
        assert_ne!(snapshot(&scene, &selection), original);

        assert!(
            engine
                .preview(&mut scene, &selection, &Command::SnapToGrid { grid: -1.0 })
                .is_err()
        );
        assert_eq!(snapshot(&scene, &selection), original);
        assert!(engine.is_previewing());

        engine
            .preview(&mut scene, &selection, &Command::Delete)
            .unwrap_err();
        assert_eq!(snapshot(&scene, &selection), original);
    }

    #[test]
    fn test_align_group_moves_members() {
        let mut scene = MemoryScene::new();
        let a = scene.spawn_box("A", Vec3::new(10.0, 0.0, 0.0), Vec3::ONE);
        let b = scene.spawn_box("B", Vec3::new(12.0, 0.0, 0.0), Vec3::ONE);
        let c = scene.spawn_box("C", Vec3::ZERO, Vec3::ONE);
        let mut engine = Manipulator::default();
        let mut history = MemoryHistory::default();

        let CommitOutcome::SelectionReplaced(grouped) = engine
            .execute(&mut scene, &mut history, &Selection::from_ids([a, b]), &Command::Group)
            .unwrap()
        else {
            panic!("group should replace the selection");
        };
        let group = grouped.first().unwrap();
        let selection = Selection::from_ids([c, group]);
        let align = Command::Align {
            axis: Axis::X,
            target: AlignTarget::Min,
        };

        engine
            .execute(&mut scene, &mut history, &selection, &align)
            .unwrap();
        let group_bounds = compute_bounds(&scene, group);
        assert_relative_eq!(group_bounds.min().x, -0.5, epsilon = 1e-5);
        assert_relative_eq!(scene.position(a).unwrap().x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(scene.position(b).unwrap().x, 2.0, epsilon = 1e-5);
        let settled = snapshot(&scene, &Selection::from_ids([a, b, c, group]));

        // Aligning an aligned selection changes nothing
        engine
            .execute(&mut scene, &mut history, &selection, &align)
            .unwrap();
        let again = snapshot(&scene, &Selection::from_ids([a, b, c, group]));
        for (before, after) in settled.iter().zip(&again) {
            let (before, after) = (before.unwrap().position, after.unwrap().position);
            assert_relative_eq!(before.x, after.x, epsilon = 1e-5);
        }

        // Undo puts the members back with their group
        history.undo(&mut scene);
        history.undo(&mut scene);
        assert_relative_eq!(scene.position(a).unwrap().x, 10.0, epsilon = 1e-5);
        assert_relative_eq!(scene.position(group).unwrap().x, 11.0, epsilon = 1e-5);
    }

    #[test]
    fn test_cancel_restores_group_and_member() {
        let mut scene = MemoryScene::new();
        let a = scene.spawn_box("A", Vec3::new(3.0, 0.0, 0.0), Vec3::ONE);
        let b = scene.spawn_box("B", Vec3::new(5.0, 0.0, 0.0), Vec3::ONE);
        let mut engine = Manipulator::default();
        let mut history = MemoryHistory::default();
        let CommitOutcome::SelectionReplaced(grouped) = engine
            .execute(&mut scene, &mut history, &Selection::from_ids([a, b]), &Command::Group)
            .unwrap()
        else {
            panic!("group should replace the selection");
        };
        // Member listed before its parent
        let selection = Selection::from_ids([a, grouped.first().unwrap()]);
        let original = snapshot(&scene, &Selection::from_ids([a, b]));

        engine
            .preview(&mut scene, &selection, &Command::SetPosition { position: Vec3::Y })
            .unwrap();
        engine.cancel_preview(&mut scene);

        assert_eq!(snapshot(&scene, &Selection::from_ids([a, b])), original);
    }

    #[test]
    fn test_huge_random_ranges_do_not_panic() {
        let (mut scene, selection) = scene_with_boxes();
        let mut engine = Manipulator::with_seed(ManipulatorConfig::new(), 5);
        let mut history = MemoryHistory::default();

        let outcome = engine
            .execute(
                &mut scene,
                &mut history,
                &selection,
                &Command::ArrangeRandomly { range: f32::MAX },
            )
            .unwrap();
        assert_eq!(outcome, CommitOutcome::Transformed(3));

        let spin = Command::RandomizeRotation {
            min: Vec3::splat(-3e38),
            max: Vec3::splat(3e38),
        };
        assert_eq!(engine.preview(&mut scene, &selection, &spin), Ok(3));
        for id in &selection {
            assert!(scene.rotation(id).unwrap().is_finite());
        }
    }

    #[test]
    fn test_preview_extends_to_new_members() {
        let (mut scene, selection) = scene_with_boxes();
        let original = snapshot(&scene, &selection);
        let mut engine = Manipulator::default();
        let first_two = Selection::from_ids(selection.iter().take(2));

        engine
            .preview(&mut scene, &first_two, &Command::MoveToOrigin)
            .unwrap();
        engine
            .preview(&mut scene, &selection, &Command::MoveToOrigin)
            .unwrap();
        assert_eq!(engine.preview_session().len(), 3);

        engine.cancel_preview(&mut scene);
        assert_eq!(snapshot(&scene, &selection), original);
    }

    #[test]
    fn test_selection_changed_cancels_and_measures() {
        let (mut scene, selection) = scene_with_boxes();
        let original = snapshot(&scene, &selection);
        let mut engine = Manipulator::default();

        engine
            .preview(&mut scene, &selection, &Command::MoveToOrigin)
            .unwrap();
        let measurement = engine.selection_changed(&mut scene, &selection);

        assert!(matches!(measurement, Measurement::Chain { count: 3, .. }));
        assert_eq!(snapshot(&scene, &selection), original);
        assert!(!engine.is_previewing());
    }

    #[test]
    fn test_from_shared_copies_config() {
        let dir = tempfile::tempdir().unwrap();
        let shared: SharedConfig = std::sync::Arc::new(parking_lot::RwLock::new(
            ConfigManager::with_path(dir.path().join("config.ron")),
        ));
        shared.write().config_mut().snap.grid_size = 0.5;

        let engine = Manipulator::from_shared(&shared);
        assert_eq!(engine.config().snap.grid_size, 0.5);
    }

    #[test]
    fn test_refresh_reads_provider() {
        let (mut scene, selection) = scene_with_boxes();
        let mut engine = Manipulator::default();
        let mut manager = SelectionManager::new();

        assert_eq!(engine.refresh(&mut scene, &manager), Measurement::TooFewObjects);
        assert!(manager.set(Selection::from_ids(selection.iter().take(2))));
        assert!(matches!(
            engine.refresh(&mut scene, &manager),
            Measurement::Pair { .. }
        ));
    }

    #[test]
    fn test_distance_connections_follow_config() {
        let (scene, selection) = scene_with_boxes();
        let mut engine = Manipulator::default();
        assert!(engine.distance_connections(&scene, &selection).is_empty());

        let mut config = engine.config().clone();
        config.measurement.show_distance_gizmos = true;
        config.measurement.max_connections = 1;
        engine.set_config(config);
        assert_eq!(engine.distance_connections(&scene, &selection).len(), 1);
    }

    #[test]
    fn test_stale_selection_is_tolerated() {
        let (mut scene, selection) = scene_with_boxes();
        let with_stale = Selection::from_ids(selection.iter().chain([ObjectId::new()]));
        let mut engine = Manipulator::default();
        let mut history = MemoryHistory::default();

        let outcome = engine
            .execute(&mut scene, &mut history, &with_stale, &Command::MoveToOrigin)
            .unwrap();
        assert_eq!(outcome, CommitOutcome::Transformed(3));
    }
}
