//! Node geometry: fixed-width table nodes whose height follows column count.

/// Geometry constants for table nodes and layer spacing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeMetrics {
    /// Height of one column row.
    pub row_height: f64,
    /// Height of the table header band.
    pub header_height: f64,
    /// Gap between vertically stacked nodes.
    pub vertical_spacing: f64,
    /// Horizontal distance between adjacent layers.
    pub horizontal_step: f64,
}

impl Default for NodeMetrics {
    fn default() -> Self {
        Self {
            row_height: 36.0,
            header_height: 50.0,
            vertical_spacing: 50.0,
            horizontal_step: 600.0,
        }
    }
}

impl NodeMetrics {
    /// Rendered height of a table node with the given column count.
    pub fn table_height(&self, column_count: usize) -> f64 {
        column_count as f64 * self.row_height + self.header_height
    }

    /// Vertical space a stacked node occupies: its height plus the fixed gap.
    pub fn stack_height(&self, column_count: usize) -> f64 {
        self.table_height(column_count) + self.vertical_spacing
    }

    /// X coordinate of a layer index.
    pub fn layer_x(&self, layer: i64) -> f64 {
        layer as f64 * self.horizontal_step
    }

    /// Layer index recovered from an x coordinate.
    pub fn layer_of_x(&self, x: f64) -> i64 {
        (x / self.horizontal_step).round() as i64
    }
}
