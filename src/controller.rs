//! Shared spin orchestration: re-entry guard, winner delivery and input lock.
//!
//! A [`SpinController`] wraps one [`Visualizer`]. `spin()` either starts a
//! session and hands back a [`SpinTicket`], or returns `Ok(None)` when a
//! session is already running. The caller's frame driver then calls
//! `advance()` until the visualizer reports its outcome; at that point the
//! ticket resolves exactly once and the controller unlocks.

use crate::feedback::{FeedbackSink, VisualizerKind};
use crate::{SelectionResult, SpinError};
use futures::channel::oneshot;
use log::{debug, info};
use rand::Rng;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// One randomizer variant driven by a [`SpinController`].
pub trait Visualizer {
    fn kind(&self) -> VisualizerKind;

    /// Validate inputs, decide or launch the outcome and start animating.
    /// Only called while no session is active.
    fn begin<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        feedback: &mut dyn FeedbackSink,
    ) -> Result<(), SpinError>;

    /// Advance the animation by `dt_ms`. Returns the outcome on the call
    /// that finishes the animation, and `None` before that.
    fn advance<R: Rng + ?Sized>(
        &mut self,
        dt_ms: f64,
        rng: &mut R,
        feedback: &mut dyn FeedbackSink,
    ) -> Option<SelectionResult>;
}

/// Resolves to the outcome of an accepted spin. Yields `None` only if the
/// controller was dropped before finishing.
#[derive(Debug)]
pub struct SpinTicket(oneshot::Receiver<SelectionResult>);

impl Future for SpinTicket {
    type Output = Option<SelectionResult>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.0).poll(cx).map(Result::ok)
    }
}

#[derive(Debug)]
struct SpinSession {
    sender: oneshot::Sender<SelectionResult>,
    elapsed_ms: f64,
}

#[derive(Debug)]
pub struct SpinController<V> {
    visualizer: V,
    session: Option<SpinSession>,
    completed_spins: u64,
}

impl<V: Visualizer> SpinController<V> {
    pub fn new(visualizer: V) -> Self {
        Self {
            visualizer,
            session: None,
            completed_spins: 0,
        }
    }

    pub fn kind(&self) -> VisualizerKind {
        self.visualizer.kind()
    }

    /// True from an accepted `spin()` until its result is delivered.
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn completed_spins(&self) -> u64 {
        self.completed_spins
    }

    pub fn visualizer(&self) -> &V {
        &self.visualizer
    }

    /// Mutable access for reconfiguration; refused during a session so a
    /// running spin keeps the inputs it started with.
    pub fn visualizer_mut(&mut self) -> Option<&mut V> {
        if self.is_active() {
            None
        } else {
            Some(&mut self.visualizer)
        }
    }

    /// Start a spin. `Ok(None)` means a spin is already running and this
    /// request was ignored.
    pub fn spin<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        feedback: &mut dyn FeedbackSink,
    ) -> Result<Option<SpinTicket>, SpinError> {
        if self.is_active() {
            debug!("{} spin ignored: already spinning", self.kind());
            return Ok(None);
        }

        self.visualizer.begin(rng, feedback)?;

        let (sender, receiver) = oneshot::channel();
        self.session = Some(SpinSession {
            sender,
            elapsed_ms: 0.0,
        });
        info!("{} spin started", self.kind());
        Ok(Some(SpinTicket(receiver)))
    }

    /// Drive the active session. Returns the outcome on the frame it is
    /// delivered; `None` otherwise, including when idle.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        dt_ms: f64,
        rng: &mut R,
        feedback: &mut dyn FeedbackSink,
    ) -> Option<SelectionResult> {
        let session = self.session.as_mut()?;
        session.elapsed_ms += dt_ms.max(0.0);

        let result = self.visualizer.advance(dt_ms, rng, feedback)?;

        let session = self.session.take()?;
        self.completed_spins += 1;
        info!(
            "{} spin finished after {:.0} ms: '{}'",
            self.kind(),
            session.elapsed_ms,
            result.value
        );
        // The caller may have dropped the ticket; the result is still returned
        let _ = session.sender.send(result.clone());
        Some(result)
    }
}
