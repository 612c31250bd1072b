//! Traversal playback: a tick-driven state machine over a prebuilt step trace, the
//! workbench session that keeps it in sync with graph mutations, and a tokio driver.

mod driver;
mod player;
mod session;

pub use driver::{spawn_playback, SharedWorkbench};
pub use player::{PlaybackFrame, PlayerConfig, PlayerState, SimulationPlayer};
pub use session::{render_frame, GraphWorkbench, HighlightRole};
