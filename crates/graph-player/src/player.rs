//! Simulation player: replays a traversal trace one step per tick.

use graph_store::GraphStore;
use graph_traverse::{run_traversal, Algorithm, TraversalError, TraversalStep};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_INTERVAL_MS: u64 = 800;
const DEFAULT_FLOOR_MS: u64 = 50;

/// Playback state.
///
/// `Idle -> Running <-> Paused`, `Running -> Finished`; `stop`/`reset` and graph mutations
/// return to `Idle` from anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    #[default]
    Idle,
    Running,
    Paused,
    Finished,
}

/// Tick timing. The effective interval is `max(floor_ms, base_interval_ms / speed)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerConfig {
    pub base_interval_ms: u64,
    pub floor_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            base_interval_ms: DEFAULT_BASE_INTERVAL_MS,
            floor_ms: DEFAULT_FLOOR_MS,
        }
    }
}

impl PlayerConfig {
    /// Reads `GRAPHWALK_TICK_MS` and `GRAPHWALK_TICK_FLOOR_MS`; unset or invalid values keep
    /// the defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(get: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str, default: u64| {
            get(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(default)
        };
        Self {
            base_interval_ms: read("GRAPHWALK_TICK_MS", DEFAULT_BASE_INTERVAL_MS),
            floor_ms: read("GRAPHWALK_TICK_FLOOR_MS", DEFAULT_FLOOR_MS),
        }
    }
}

/// One emitted step, with its position in the trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackFrame {
    pub index: usize,
    pub total: usize,
    pub step: TraversalStep,
}

pub struct SimulationPlayer {
    config: PlayerConfig,
    state: PlayerState,
    algorithm: Option<Algorithm>,
    steps: Vec<TraversalStep>,
    index: usize,
    speed: f64,
    /// Store revision the trace was built against.
    revision: Option<u64>,
}

impl SimulationPlayer {
    pub fn new(config: PlayerConfig) -> Self {
        Self {
            config,
            state: PlayerState::Idle,
            algorithm: None,
            steps: Vec::new(),
            index: 0,
            speed: 1.0,
            revision: None,
        }
    }

    /// Build the whole trace up front and emit step 0. Traversal errors are returned before
    /// any state changes.
    pub fn start(
        &mut self,
        store: &GraphStore,
        algorithm: Algorithm,
        start_id: &str,
    ) -> Result<Option<PlaybackFrame>, TraversalError> {
        let steps = run_traversal(store, algorithm, start_id)?;
        self.steps = steps;
        self.algorithm = Some(algorithm);
        self.index = 0;
        self.revision = Some(store.revision());
        if self.steps.is_empty() {
            self.state = PlayerState::Finished;
            return Ok(None);
        }
        self.state = PlayerState::Running;
        tracing::info!(
            algorithm = %algorithm,
            start = %start_id.trim(),
            steps = self.steps.len(),
            "simulation started"
        );
        Ok(self.current_frame())
    }

    /// Advance one step. Only effective while `Running`; a trace built against an older
    /// store revision is discarded instead of replayed.
    pub fn tick(&mut self, store: &GraphStore) -> Option<PlaybackFrame> {
        if self.state != PlayerState::Running {
            return None;
        }
        if self.revision != Some(store.revision()) {
            self.cancel();
            return None;
        }
        let next = self.index + 1;
        if next >= self.steps.len() {
            self.state = PlayerState::Finished;
            tracing::info!(steps = self.steps.len(), "simulation finished");
            return None;
        }
        self.index = next;
        self.current_frame()
    }

    /// `Running -> Paused`. Returns whether the state changed.
    pub fn pause(&mut self) -> bool {
        if self.state == PlayerState::Running {
            self.state = PlayerState::Paused;
            return true;
        }
        false
    }

    /// `Paused -> Running`. Returns whether the state changed.
    pub fn resume(&mut self) -> bool {
        if self.state == PlayerState::Paused {
            self.state = PlayerState::Running;
            return true;
        }
        false
    }

    /// Change the playback speed multiplier; takes effect on the next scheduled tick.
    pub fn set_speed(&mut self, multiplier: f64) {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            tracing::warn!(multiplier, "ignoring invalid playback speed");
            return;
        }
        self.speed = multiplier;
    }

    /// Discard the trace and return to `Idle`.
    pub fn stop(&mut self) {
        self.state = PlayerState::Idle;
        self.algorithm = None;
        self.steps.clear();
        self.index = 0;
        self.revision = None;
    }

    pub fn reset(&mut self) {
        self.stop();
    }

    /// Stop because the graph changed under the trace.
    pub fn cancel(&mut self) {
        if self.state != PlayerState::Idle {
            tracing::info!(state = ?self.state, "simulation cancelled by graph mutation");
        }
        self.stop();
    }

    /// `max(floor, base / speed)`. Saturates at `Duration::MAX` for vanishingly small speeds.
    pub fn interval(&self) -> Duration {
        let scaled = self.config.base_interval_ms as f64 / self.speed;
        Duration::try_from_secs_f64(scaled / 1000.0)
            .unwrap_or(Duration::MAX)
            .max(Duration::from_millis(self.config.floor_ms))
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Whether the external scheduler should keep calling `tick`.
    pub fn is_ticking(&self) -> bool {
        self.state == PlayerState::Running
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn algorithm(&self) -> Option<Algorithm> {
        self.algorithm
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    /// Frame at the current index, if a trace is loaded.
    pub fn current_frame(&self) -> Option<PlaybackFrame> {
        self.steps.get(self.index).map(|step| PlaybackFrame {
            index: self.index,
            total: self.steps.len(),
            step: step.clone(),
        })
    }
}

impl Default for SimulationPlayer {
    fn default() -> Self {
        Self::new(PlayerConfig::default())
    }
}
