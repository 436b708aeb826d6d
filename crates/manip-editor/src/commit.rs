//! Undoable execution of commands

use manip_core::ops::{self, GroundProbe, ManipResult};
use manip_core::{SceneHost, Selection, TransformSnapshot, UndoRecorder};
use rand::Rng;

use crate::command::Command;
use crate::preview::PreviewSession;

/// What a successful commit did
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// Transforms were written for this many objects
    Transformed(usize),
    /// The hierarchy changed; the host should select these objects instead
    SelectionReplaced(Selection),
}

/// Execute a command for real.
///
/// Any running preview is cancelled first, so the recorder always sees the
/// transforms from before the preview. Validation and geometry checks run
/// before the recorder is called; a rejected command records and writes
/// nothing.
pub fn commit<S, U, R>(
    session: &mut PreviewSession,
    scene: &mut S,
    recorder: &mut U,
    selection: &Selection,
    command: &Command,
    rng: &mut R,
    probe: GroundProbe,
) -> ManipResult<CommitOutcome>
where
    S: SceneHost + ?Sized,
    U: UndoRecorder + ?Sized,
    R: Rng,
{
    session.cancel(scene);

    command.validate(selection)?;
    command.check_geometry(scene, selection)?;

    let label = command.description();
    let outcome = match command {
        Command::Duplicate => {
            CommitOutcome::SelectionReplaced(ops::duplicate(scene, recorder, selection)?)
        }
        Command::Delete => {
            ops::delete(scene, recorder, selection)?;
            CommitOutcome::SelectionReplaced(Selection::new())
        }
        Command::Group => {
            let group = ops::group(scene, recorder, selection)?;
            CommitOutcome::SelectionReplaced(Selection::single(group))
        }
        _ => {
            let before = TransformSnapshot::capture(scene, &command.affected(selection));
            recorder.record_before_mutation(&before, label);
            CommitOutcome::Transformed(command.apply_transform(scene, selection, rng, probe)?)
        }
    };

    tracing::info!("Committed {}", label);
    Ok(outcome)
}
