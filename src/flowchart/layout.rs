use super::definition::{FlowchartContent, Position};
use serde::Deserialize;

/// Implicit grid used to place nodes that carry no explicit position.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridLayout {
    pub columns: usize,
    pub cell_width: f64,
    pub cell_height: f64,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            columns: 3,
            cell_width: 250.0,
            cell_height: 150.0,
        }
    }
}

impl GridLayout {
    /// Grid cell for the node at `index` in the node list.
    pub fn position_for(&self, index: usize) -> Position {
        let columns = self.columns.max(1);
        Position {
            x: (index % columns) as f64 * self.cell_width,
            y: (index / columns) as f64 * self.cell_height,
        }
    }

    /// Returns a copy of `content` in which every unpositioned node sits on its grid cell.
    ///
    /// The cell is derived from the node's index in the full list, so two unpositioned nodes
    /// never share a cell. Explicit positions are left alone.
    pub fn apply(&self, content: &FlowchartContent) -> FlowchartContent {
        let mut laid_out = content.clone();
        for (index, node) in laid_out.nodes.iter_mut().enumerate() {
            if node.position.is_none() {
                node.position = Some(self.position_for(index));
            }
        }
        laid_out
    }
}

/// Applies the default 3-column grid to unpositioned nodes.
pub fn apply_grid_fallback(content: &FlowchartContent) -> FlowchartContent {
    GridLayout::default().apply(content)
}
