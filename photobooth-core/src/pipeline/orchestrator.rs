use std::sync::Arc;
use std::thread::JoinHandle;

use crate::foundation::core::{Frame, FrameOrigin, FrameSequence};
use crate::foundation::error::{PhotoboothError, PhotoboothResult};
use crate::pipeline::session::{Session, SessionHandle};
use crate::stylize::client::{Instruction, StyleResult, Stylizer};

/// Summary of a completed bulk stylize run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Input frames in the run.
    pub total: usize,
    /// Output frames appended to the session.
    pub produced: usize,
    /// Frames for which the service answered without an image. They are left out of the output.
    pub skipped: Vec<SkippedFrame>,
}

/// An input frame that produced no output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedFrame {
    /// Input index.
    pub index: usize,
    /// The service's explanation, if any.
    pub advisory: Option<String>,
}

/// Result of a single-frame edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    /// The output now holds exactly the edited frame.
    Applied {
        /// Advisory text returned with the image.
        advisory: Option<String>,
    },
    /// The service returned no image; the output is unchanged.
    NoOutput {
        /// The service's explanation, if any.
        advisory: Option<String>,
    },
}

/// Pending bulk run on its worker thread.
pub struct BatchHandle {
    join: JoinHandle<PhotoboothResult<BatchReport>>,
}

impl BatchHandle {
    /// Block until the run finishes.
    pub fn wait(self) -> PhotoboothResult<BatchReport> {
        self.join
            .join()
            .map_err(|_| PhotoboothError::Other(anyhow::anyhow!("stylize worker panicked")))?
    }

    /// `true` once the worker has returned.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

/// Exclusive claim on a session for one run. Dropping it clears `busy` unless the session was
/// reset in the meantime (a reset already cleared it and belongs to a newer generation).
struct RunTicket {
    session: SessionHandle,
    generation: u64,
}

impl Drop for RunTicket {
    fn drop(&mut self) {
        let mut s = self.session.lock();
        if s.generation() == self.generation {
            s.set_busy(false);
        }
    }
}

/// Drives captured frames through a [`Stylizer`], one call at a time, in input order.
#[derive(Clone)]
pub struct Orchestrator {
    stylizer: Arc<dyn Stylizer>,
}

impl Orchestrator {
    /// Orchestrator over `stylizer`.
    pub fn new(stylizer: Arc<dyn Stylizer>) -> Self {
        Self { stylizer }
    }

    /// Stylize every captured frame with `style`, blocking until done.
    ///
    /// The previous output is cleared first. Output index `i` maps to the `i`-th frame that
    /// produced an image; frames answered without an image are skipped. The first failing call
    /// stops the run with [`PhotoboothError::BatchAborted`] and the frames produced before it
    /// stay in the session.
    #[tracing::instrument(skip(self, session))]
    pub fn stylize_batch(&self, session: &SessionHandle, style: &str) -> PhotoboothResult<BatchReport> {
        let instruction = Instruction::style(style);
        let (ticket, frames) = self.acquire_batch(session, &instruction)?;
        self.run_batch(ticket, frames, instruction)
    }

    /// Like [`Orchestrator::stylize_batch`], but on a worker thread.
    ///
    /// The session is claimed before this returns, so a second call while the run is in flight
    /// fails with [`PhotoboothError::Busy`] instead of queueing.
    pub fn spawn_batch(&self, session: &SessionHandle, style: &str) -> PhotoboothResult<BatchHandle> {
        let instruction = Instruction::style(style);
        let (ticket, frames) = self.acquire_batch(session, &instruction)?;
        let this = self.clone();
        let join = std::thread::Builder::new()
            .name("stylize-batch".to_string())
            .spawn(move || this.run_batch(ticket, frames, instruction))
            .map_err(|e| PhotoboothError::Other(anyhow::anyhow!("spawn stylize worker: {e}")))?;
        Ok(BatchHandle { join })
    }

    /// Apply free-form `text` to the first output frame (or the first captured frame when
    /// nothing has been stylized yet).
    ///
    /// On success the whole output is replaced by the single edited frame, collapsing any
    /// multi-frame batch. Failures and empty answers leave the output untouched.
    #[tracing::instrument(skip(self, session))]
    pub fn edit_first(&self, session: &SessionHandle, text: &str) -> PhotoboothResult<EditOutcome> {
        let instruction = Instruction::edit(text);
        let (ticket, source) = self.acquire(session, &instruction, |s| {
            s.stylized()
                .first()
                .or_else(|| s.captured().first())
                .cloned()
                .ok_or_else(|| PhotoboothError::validation("nothing to edit: capture media first"))
        })?;

        let result = self.stylizer.stylize(&source, &instruction);

        let mut s = ticket.session.lock();
        if s.generation() != ticket.generation {
            tracing::warn!("edit result dropped: session was reset");
            return Err(PhotoboothError::Superseded);
        }
        match result? {
            StyleResult::Output { frame, advisory } => {
                s.set_stylized(FrameSequence::single(FrameOrigin::Stylized, frame));
                tracing::info!("edit applied");
                Ok(EditOutcome::Applied { advisory })
            }
            StyleResult::NoOutput { advisory } => {
                tracing::warn!(advisory = advisory.as_deref(), "edit produced no image");
                Ok(EditOutcome::NoOutput { advisory })
            }
        }
    }

    fn acquire_batch(
        &self,
        session: &SessionHandle,
        instruction: &Instruction,
    ) -> PhotoboothResult<(RunTicket, Vec<Frame>)> {
        let (ticket, frames) = self.acquire(session, instruction, |s| {
            if s.captured().is_empty() {
                return Err(PhotoboothError::validation(
                    "nothing to stylize: capture media first",
                ));
            }
            Ok(s.captured().frames().to_vec())
        })?;
        ticket.session.lock().stylized_mut().clear();
        Ok((ticket, frames))
    }

    /// Claim the session: reject when busy, pick the input, check credentials, then mark busy.
    fn acquire<T>(
        &self,
        session: &SessionHandle,
        instruction: &Instruction,
        select: impl FnOnce(&Session) -> PhotoboothResult<T>,
    ) -> PhotoboothResult<(RunTicket, T)> {
        instruction.validate()?;
        let mut s = session.lock();
        if s.is_busy() {
            return Err(PhotoboothError::Busy);
        }
        let input = select(&*s)?;
        self.stylizer.check_credentials()?;
        s.set_busy(true);
        let ticket = RunTicket {
            session: session.clone(),
            generation: s.generation(),
        };
        Ok((ticket, input))
    }

    fn run_batch(
        &self,
        ticket: RunTicket,
        frames: Vec<Frame>,
        instruction: Instruction,
    ) -> PhotoboothResult<BatchReport> {
        let mut report = BatchReport {
            total: frames.len(),
            ..BatchReport::default()
        };

        for (index, frame) in frames.iter().enumerate() {
            let result = self.stylizer.stylize(frame, &instruction);

            let mut s = ticket.session.lock();
            if s.generation() != ticket.generation {
                tracing::warn!(index, "batch result dropped: session was reset");
                return Err(PhotoboothError::Superseded);
            }
            match result {
                Ok(StyleResult::Output { frame, .. }) => {
                    s.stylized_mut().push(frame);
                    report.produced += 1;
                    tracing::debug!(index, total = report.total, "frame stylized");
                }
                Ok(StyleResult::NoOutput { advisory }) => {
                    tracing::warn!(index, advisory = advisory.as_deref(), "frame produced no image; skipped");
                    report.skipped.push(SkippedFrame { index, advisory });
                }
                Err(source) => {
                    tracing::error!(index, produced = report.produced, error = %source, "batch aborted");
                    return Err(PhotoboothError::BatchAborted {
                        index,
                        produced: report.produced,
                        source: Box::new(source),
                    });
                }
            }
        }

        tracing::info!(
            total = report.total,
            produced = report.produced,
            skipped = report.skipped.len(),
            "batch complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/orchestrator.rs"]
mod tests;
