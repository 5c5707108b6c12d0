use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::foundation::core::{FrameOrigin, FrameSequence};
use crate::present::presenter::PresentationMode;

/// The single long-lived mutable holder of captured and stylized frames.
///
/// Only the capture step (through [`Session::load`]) and the orchestrator mutate it. The
/// `generation` counter changes on every reset so in-flight runs can detect that their results
/// are stale.
#[derive(Debug)]
pub struct Session {
    captured: FrameSequence,
    stylized: FrameSequence,
    busy: bool,
    generation: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            captured: FrameSequence::empty(FrameOrigin::Upload),
            stylized: FrameSequence::empty(FrameOrigin::Stylized),
            busy: false,
            generation: 0,
        }
    }
}

impl Session {
    /// Fresh session with no media.
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames from the current source media.
    pub fn captured(&self) -> &FrameSequence {
        &self.captured
    }

    /// Current pipeline output.
    pub fn stylized(&self) -> &FrameSequence {
        &self.stylized
    }

    /// `true` while a pipeline run owns the session.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Bumped on every reset.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// How the current output should be shown.
    pub fn presentation_mode(&self) -> PresentationMode {
        PresentationMode::for_sequence(&self.stylized)
    }

    /// Drop all media and detach any in-flight run. The run's late results will be ignored.
    pub fn reset(&mut self) {
        if self.busy {
            tracing::warn!(
                generation = self.generation,
                "session reset while a run was in flight; its results will be dropped"
            );
        }
        self.captured = FrameSequence::empty(FrameOrigin::Upload);
        self.stylized = FrameSequence::empty(FrameOrigin::Stylized);
        self.busy = false;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Reset, then install newly captured source media.
    pub fn load(&mut self, captured: FrameSequence) {
        self.reset();
        tracing::debug!(
            origin = ?captured.origin(),
            frames = captured.len(),
            generation = self.generation,
            "session loaded new media"
        );
        self.captured = captured;
    }

    pub(crate) fn stylized_mut(&mut self) -> &mut FrameSequence {
        &mut self.stylized
    }

    pub(crate) fn set_stylized(&mut self, seq: FrameSequence) {
        self.stylized = seq;
    }

    pub(crate) fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }
}

/// Shared, explicitly passed handle to a [`Session`].
#[derive(Clone, Debug, Default)]
pub struct SessionHandle(Arc<Mutex<Session>>);

impl SessionHandle {
    /// Handle to a fresh session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the session. A poisoned lock is recovered: the session holds plain data only.
    pub fn lock(&self) -> MutexGuard<'_, Session> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Install new source media (see [`Session::load`]).
    pub fn load(&self, captured: FrameSequence) {
        self.lock().load(captured);
    }

    /// Snapshot of the current output.
    pub fn stylized(&self) -> FrameSequence {
        self.lock().stylized().clone()
    }

    /// Snapshot of the captured frames.
    pub fn captured(&self) -> FrameSequence {
        self.lock().captured().clone()
    }

    /// See [`Session::is_busy`].
    pub fn is_busy(&self) -> bool {
        self.lock().is_busy()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/session.rs"]
mod tests;
