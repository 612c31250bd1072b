//! Workbench session: one graph, one player, one selection, kept consistent.

use crate::player::{PlaybackFrame, PlayerConfig, SimulationPlayer};
use graph_store::{merge, GraphStore};
use graph_traverse::{traversal_order, Algorithm, TraversalError};
use graph_types::{
    EdgeKey, GraphPayload, GraphRenderer, GraphStoreError, NodeAttributes, Selection,
};

/// Highlight token passed to the renderer; mapping to a concrete color is the renderer's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightRole {
    Current,
    Frontier,
    Visited,
    Discovered,
    Skipped,
}

impl HighlightRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            HighlightRole::Current => "current",
            HighlightRole::Frontier => "frontier",
            HighlightRole::Visited => "visited",
            HighlightRole::Discovered => "discovered",
            HighlightRole::Skipped => "skipped",
        }
    }
}

/// Owns the store and the player. Every successful mutation cancels playback.
pub struct GraphWorkbench {
    store: GraphStore,
    player: SimulationPlayer,
    selection: Option<Selection>,
}

impl GraphWorkbench {
    pub fn new(config: PlayerConfig) -> Self {
        Self::with_store(GraphStore::new(), config)
    }

    pub fn with_store(store: GraphStore, config: PlayerConfig) -> Self {
        Self {
            store,
            player: SimulationPlayer::new(config),
            selection: None,
        }
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn player(&self) -> &SimulationPlayer {
        &self.player
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn add_node(
        &mut self,
        id: &str,
        label: Option<&str>,
        attributes: Option<NodeAttributes>,
    ) -> Result<(), GraphStoreError> {
        self.store.add_node(id, label, attributes)?;
        self.after_mutation();
        Ok(())
    }

    pub fn update_node_attributes(
        &mut self,
        id: &str,
        partial: &NodeAttributes,
    ) -> Result<(), GraphStoreError> {
        self.store.update_node_attributes(id, partial)?;
        self.after_mutation();
        Ok(())
    }

    pub fn add_edge(
        &mut self,
        from: &str,
        to: &str,
        relation_type: Option<&str>,
    ) -> Result<(), GraphStoreError> {
        self.store.add_edge(from, to, relation_type)?;
        self.after_mutation();
        Ok(())
    }

    pub fn remove_node(&mut self, id: &str) -> Result<(), GraphStoreError> {
        self.store.remove_node(id)?;
        self.after_mutation();
        Ok(())
    }

    pub fn remove_edge(&mut self, from: &str, to: &str) -> Result<(), GraphStoreError> {
        self.store.remove_edge(from, to)?;
        self.after_mutation();
        Ok(())
    }

    pub fn reset(&mut self) {
        self.store.reset();
        self.after_mutation();
    }

    /// Replace the graph. On error the previous graph, player, and selection are kept.
    pub fn load(&mut self, payload: &GraphPayload) -> Result<(), GraphStoreError> {
        self.store.load(payload)?;
        self.after_mutation();
        Ok(())
    }

    /// Merge `incoming` into the current graph, which takes precedence.
    pub fn merge_in(&mut self, incoming: &GraphPayload) -> Result<(), GraphStoreError> {
        let merged = merge(&self.store.snapshot(), incoming);
        self.load(&merged)
    }

    fn after_mutation(&mut self) {
        self.player.cancel();
        let stale = match &self.selection {
            Some(Selection::Node { id }) => !self.store.contains_node(id),
            Some(Selection::Edge { key }) => !self.store.contains_edge(key.low(), key.high()),
            None => false,
        };
        if stale {
            tracing::debug!(selection = ?self.selection, "selection target removed");
            self.selection = None;
        }
    }

    pub fn start_simulation(
        &mut self,
        algorithm: Algorithm,
        start_id: &str,
    ) -> Result<Option<PlaybackFrame>, TraversalError> {
        self.player.start(&self.store, algorithm, start_id)
    }

    pub fn tick(&mut self) -> Option<PlaybackFrame> {
        self.player.tick(&self.store)
    }

    pub fn pause(&mut self) -> bool {
        self.player.pause()
    }

    pub fn resume(&mut self) -> bool {
        self.player.resume()
    }

    pub fn stop(&mut self) {
        self.player.stop();
    }

    pub fn set_speed(&mut self, multiplier: f64) {
        self.player.set_speed(multiplier);
    }

    pub fn traversal_order(
        &self,
        algorithm: Algorithm,
        start_id: &str,
    ) -> Result<Vec<String>, TraversalError> {
        traversal_order(&self.store, algorithm, start_id)
    }

    /// Record what the renderer reports as selected.
    pub fn select(&mut self, selection: Selection) -> Result<(), GraphStoreError> {
        match &selection {
            Selection::Node { id } if !self.store.contains_node(id) => {
                return Err(GraphStoreError::NodeNotFound(id.clone()));
            }
            Selection::Edge { key } if !self.store.contains_edge(key.low(), key.high()) => {
                return Err(GraphStoreError::EdgeNotFound(key.clone()));
            }
            _ => {}
        }
        self.selection = Some(selection);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Push the whole graph to the renderer and drop stale highlights.
    pub fn sync_renderer(&self, renderer: &mut dyn GraphRenderer) {
        renderer.clear_highlights();
        renderer.sync(&self.store.snapshot());
    }
}

impl Default for GraphWorkbench {
    fn default() -> Self {
        Self::new(PlayerConfig::default())
    }
}

/// Paint one frame. With no `previous` frame all highlights are cleared first; otherwise
/// only the previously probed edge is.
pub fn render_frame(
    frame: &PlaybackFrame,
    previous: Option<&PlaybackFrame>,
    renderer: &mut dyn GraphRenderer,
) {
    match previous.and_then(|p| p.step.edge.as_ref()) {
        Some(probe) => renderer.clear_edge(&EdgeKey::new(&probe.from, &probe.to)),
        None if previous.is_none() => renderer.clear_highlights(),
        None => {}
    }
    let step = &frame.step;
    let visited: Vec<String> = step.visited.iter().cloned().collect();
    renderer.highlight_nodes(&visited, HighlightRole::Visited.as_str());
    renderer.highlight_nodes(&step.frontier, HighlightRole::Frontier.as_str());
    if let Some(current) = &step.current {
        renderer.highlight_nodes(std::slice::from_ref(current), HighlightRole::Current.as_str());
    }
    if let Some(probe) = &step.edge {
        let role = if probe.discovered {
            HighlightRole::Discovered
        } else {
            HighlightRole::Skipped
        };
        renderer.highlight_edge(&EdgeKey::new(&probe.from, &probe.to), role.as_str());
    }
}
