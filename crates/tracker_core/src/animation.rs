//! Fixed-cadence marker stepping along a path.

use std::time::Duration;

use map_display::Marker;
use shared::domain::Path;
use thiserror::Error;
use tokio::{
    sync::{oneshot, watch},
    task::JoinHandle,
    time::{interval_at, Instant},
};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    /// `completed` path points have been visited so far.
    Running { completed: usize },
    Stopped,
    Cancelled,
}

impl AnimationState {
    pub fn is_terminal(self) -> bool {
        matches!(self, AnimationState::Stopped | AnimationState::Cancelled)
    }
}

#[derive(Debug, Error)]
pub enum AnimationError {
    #[error("path needs at least two points to animate, got {0}")]
    PathTooShort(usize),
    #[error("animation period must be non-zero")]
    ZeroPeriod,
}

/// Owner of a running animation. Cancelling or dropping the handle stops the
/// timer.
pub struct AnimationHandle {
    cancel_tx: Option<oneshot::Sender<()>>,
    state_rx: watch::Receiver<AnimationState>,
    task: JoinHandle<()>,
}

impl AnimationHandle {
    pub fn state(&self) -> AnimationState {
        *self.state_rx.borrow()
    }

    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Waits until the animation stops or is cancelled.
    pub async fn finished(&mut self) -> AnimationState {
        match self.state_rx.wait_for(|s| s.is_terminal()).await {
            Ok(state) => *state,
            // Sender gone without a terminal state: the task was aborted.
            Err(_) => AnimationState::Cancelled,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<AnimationState> {
        self.state_rx.clone()
    }
}

impl Drop for AnimationHandle {
    fn drop(&mut self) {
        self.cancel();
        self.task.abort();
    }
}

/// Moves `marker` to each point of `path` in turn, one move per `period`.
///
/// The first move happens one period after the call. Every move removes the
/// marker and places a new one.
pub fn animate_marker(
    marker: Marker,
    path: Path,
    period: Duration,
) -> Result<AnimationHandle, AnimationError> {
    if path.len() < 2 {
        return Err(AnimationError::PathTooShort(path.len()));
    }
    if period.is_zero() {
        return Err(AnimationError::ZeroPeriod);
    }

    let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();
    let (state_tx, state_rx) = watch::channel(AnimationState::Running { completed: 0 });
    let steps = path.len();

    let task = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        let mut marker = marker;
        info!(steps, ?period, "animation: started");

        for (index, point) in path.into_iter().enumerate() {
            tokio::select! {
                biased;
                _ = &mut cancel_rx => {
                    info!(index, "animation: cancelled");
                    state_tx.send_replace(AnimationState::Cancelled);
                    return;
                }
                _ = ticker.tick() => {}
            }

            marker = match marker.replace(point) {
                Ok(next) => next,
                Err(err) => {
                    warn!(index, "animation: marker update failed: {err:#}");
                    state_tx.send_replace(AnimationState::Stopped);
                    return;
                }
            };
            debug!(index, position = %point, "animation: step");
            state_tx.send_replace(AnimationState::Running {
                completed: index + 1,
            });
        }

        info!(steps, "animation: finished");
        state_tx.send_replace(AnimationState::Stopped);
    });

    Ok(AnimationHandle {
        cancel_tx: Some(cancel_tx),
        state_rx,
        task,
    })
}

#[cfg(test)]
#[path = "tests/animation_tests.rs"]
mod tests;
