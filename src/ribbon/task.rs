//! Running a ribbon edit on a worker thread.
//!
//! A [`RibbonTask`] takes ownership of the mesh, runs
//! [`apply_ribbon_with_progress`] on its own thread and hands the mesh back
//! from [`RibbonTask::join`]. The edit can be observed and cancelled from the
//! spawning thread while it runs.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::algo::{CancelToken, Progress};
use crate::error::Result;
use crate::mesh::{MeshIndex, TriMesh};

use super::curve::RibbonCurves;
use super::pipeline::{apply_ribbon_with_progress, ProfileConfig, RibbonOptions, RibbonReport};
use super::services::RibbonServices;

#[derive(Debug, Default)]
struct SharedState {
    permille: AtomicUsize,
    stage: Mutex<String>,
}

/// A ribbon edit running in the background.
pub struct RibbonTask<I: MeshIndex = u32> {
    handle: JoinHandle<(TriMesh<I>, Result<RibbonReport<I>>)>,
    state: Arc<SharedState>,
    cancel: CancelToken,
}

impl<I: MeshIndex> RibbonTask<I> {
    /// Start editing `mesh` on a new thread.
    pub fn spawn<S>(
        mesh: TriMesh<I>,
        curves: RibbonCurves<I>,
        profile: impl Into<ProfileConfig>,
        options: RibbonOptions,
        services: S,
    ) -> Self
    where
        S: RibbonServices<I> + Send + 'static,
    {
        Self::spawn_with_cancel(mesh, curves, profile, options, services, CancelToken::new())
    }

    /// Start editing `mesh` on a new thread, observing an existing cancel token.
    pub fn spawn_with_cancel<S>(
        mut mesh: TriMesh<I>,
        curves: RibbonCurves<I>,
        profile: impl Into<ProfileConfig>,
        options: RibbonOptions,
        services: S,
        cancel: CancelToken,
    ) -> Self
    where
        S: RibbonServices<I> + Send + 'static,
    {
        let config = profile.into();
        let state = Arc::new(SharedState::default());

        let sink = Arc::clone(&state);
        let progress = Progress::new(move |current, total, message| {
            if total > 0 {
                sink.permille.store(current * 1000 / total, Ordering::Relaxed);
            }
            if let Ok(mut stage) = sink.stage.lock() {
                message.clone_into(&mut *stage);
            }
        });

        let worker_cancel = cancel.clone();
        let handle = thread::spawn(move || {
            let result = apply_ribbon_with_progress(
                &mut mesh,
                &curves,
                config,
                &options,
                &services,
                &progress,
                &worker_cancel,
            );
            (mesh, result)
        });

        Self { handle, state, cancel }
    }

    /// Completion in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.permille() as f64 / 1000.0
    }

    /// Completion in permille.
    pub fn permille(&self) -> usize {
        self.state.permille.load(Ordering::Relaxed)
    }

    /// The stage most recently entered.
    pub fn stage(&self) -> String {
        self.state
            .stage
            .lock()
            .map(|stage| stage.clone())
            .unwrap_or_default()
    }

    /// Ask the edit to stop before its next stage.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// The token this task observes.
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Whether the worker thread has finished.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the edit and take the mesh back.
    ///
    /// The mesh is the edited mesh on success and the untouched input
    /// otherwise. A panic on the worker thread is resumed on the caller.
    pub fn join(self) -> (TriMesh<I>, Result<RibbonReport<I>>) {
        match self.handle.join() {
            Ok(outcome) => outcome,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeshError;
    use crate::mesh::fixtures::{ring, tube_mesh};
    use crate::ribbon::pipeline::Profile;
    use crate::ribbon::services::MeshServices;

    fn curves() -> RibbonCurves {
        RibbonCurves::closed(ring(3, 8), ring(2, 8), ring(4, 8))
    }

    #[test]
    fn test_task_returns_edited_mesh() {
        let mesh = tube_mesh(7, 8, 1.0);
        let faces = mesh.num_faces();
        let task = RibbonTask::spawn(mesh, curves(), Profile::Blend, RibbonOptions::default(), MeshServices::new());

        let (mesh, result) = task.join();
        let report = result.unwrap();
        assert_eq!(mesh.num_faces(), faces - report.deleted_triangles + report.strip_triangles);
    }

    #[test]
    fn test_task_reports_completion() {
        let task = RibbonTask::spawn(
            tube_mesh(7, 8, 1.0),
            curves(),
            Profile::Sharp,
            RibbonOptions::default().sequential(),
            MeshServices::new(),
        );
        let state = Arc::clone(&task.state);
        let (_, result) = task.join();
        assert!(result.is_ok());
        assert_eq!(state.permille.load(Ordering::Relaxed), 1000);
        assert_eq!(*state.stage.lock().unwrap(), "cleaning up");
    }

    #[test]
    fn test_cancelled_task_returns_input() {
        let mesh = tube_mesh(7, 8, 1.0);
        let faces = mesh.num_faces();
        let token = CancelToken::new();
        token.cancel();

        let task = RibbonTask::spawn_with_cancel(
            mesh,
            curves(),
            Profile::Chamfer,
            RibbonOptions::default(),
            MeshServices::new(),
            token,
        );
        assert!(task.cancel_token().is_cancelled());

        let (mesh, result) = task.join();
        assert!(matches!(result, Err(MeshError::Cancelled)));
        assert_eq!(mesh.num_faces(), faces);
        assert_eq!(mesh.num_vertex_slots(), 7 * 8);
    }
}
