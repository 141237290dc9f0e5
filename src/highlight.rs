use std::collections::HashSet;

use crate::layout::Simulation;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeStyle {
    pub selected: bool,
    /// Directly connected to the selected node.
    pub related: bool,
    pub dimmed: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeStyle {
    pub highlighted: bool,
    pub dimmed: bool,
}

/// Rendering state derived from the selection and file emphasis for the
/// currently displayed subset. Indices refer to the running simulation's
/// nodes and links.
#[derive(Clone, Debug, Default)]
pub struct HighlightState {
    selected: Option<usize>,
    related_nodes: HashSet<usize>,
    highlighted_links: HashSet<usize>,
    file_nodes: Option<HashSet<usize>>,
}

impl HighlightState {
    pub fn build(
        simulation: Option<&Simulation>,
        selected_id: Option<&str>,
        file_path: Option<&str>,
    ) -> Self {
        let Some(simulation) = simulation else {
            return Self::default();
        };

        let mut state = Self {
            selected: selected_id.and_then(|id| simulation.index_of(id)),
            ..Self::default()
        };

        if let Some(selected) = state.selected {
            for (link_index, link) in simulation.links().iter().enumerate() {
                if link.source == selected || link.target == selected {
                    state.highlighted_links.insert(link_index);
                    state.related_nodes.insert(link.source);
                    state.related_nodes.insert(link.target);
                }
            }
            state.related_nodes.remove(&selected);
        }

        if let Some(path) = file_path {
            state.file_nodes = Some(
                simulation
                    .nodes()
                    .iter()
                    .enumerate()
                    .filter(|(_, node)| node.file_path == path)
                    .map(|(index, _)| index)
                    .collect(),
            );
        }

        state
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn node_style(&self, index: usize) -> NodeStyle {
        NodeStyle {
            selected: self.selected == Some(index),
            related: self.related_nodes.contains(&index),
            dimmed: self
                .file_nodes
                .as_ref()
                .is_some_and(|nodes| !nodes.contains(&index)),
        }
    }

    pub fn edge_style(&self, link_index: usize) -> EdgeStyle {
        EdgeStyle {
            highlighted: self.highlighted_links.contains(&link_index),
            dimmed: self.file_nodes.is_some(),
        }
    }
}
