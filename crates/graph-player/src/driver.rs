//! Background playback: one tokio task ticking a shared workbench.

use crate::player::{PlaybackFrame, PlayerState};
use crate::session::GraphWorkbench;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

pub type SharedWorkbench = Arc<Mutex<GraphWorkbench>>;

/// Spawn a worker that ticks `workbench` at the player's current interval and forwards each
/// frame. The task ends (closing the channel) once the player leaves `Running`/`Paused` or
/// the receiver is dropped. Call after `start_simulation`; frame 0 is not re-sent.
pub fn spawn_playback(
    workbench: SharedWorkbench,
) -> (JoinHandle<()>, mpsc::UnboundedReceiver<PlaybackFrame>) {
    let (tx, rx) = mpsc::unbounded_channel::<PlaybackFrame>();
    let handle = tokio::spawn(async move {
        let mut sent = 0usize;
        loop {
            let interval = {
                let guard = workbench.lock().await;
                match guard.player().state() {
                    PlayerState::Running | PlayerState::Paused => guard.player().interval(),
                    _ => break,
                }
            };
            tokio::time::sleep(interval).await;

            let mut guard = workbench.lock().await;
            match guard.player().state() {
                PlayerState::Running => {}
                PlayerState::Paused => continue,
                _ => break,
            }
            if let Some(frame) = guard.tick() {
                if tx.send(frame).is_err() {
                    tracing::debug!("playback receiver dropped");
                    break;
                }
                sent += 1;
            }
        }
        tracing::debug!(frames = sent, "playback driver stopped");
    });
    (handle, rx)
}
