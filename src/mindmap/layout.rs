//! Layout engine: converts a mind-map tree into positioned nodes and edges.
//!
//! Two passes over the tree:
//! 1. post-order: subtree weights (`weigh`), leaves weigh 1 and deeper
//!    internal nodes are inflated by `1 + level × weight_level_factor`;
//! 2. pre-order: placement (`place`), each node's children share a span on
//!    the spread axis (`y`) proportional to their weights, one depth step
//!    further along the depth axis (`x`).
//!
//! The result is a pure function of tree shape and [`LayoutConfig`]; node
//! text only feeds the `min_width` hint on each node's style.

use serde::{Deserialize, Serialize};

use super::node::MindMapNode;

/// Node height assumed when computing bounds for export.
const NODE_HEIGHT: f64 = 50.0;
/// Never zoom in past this when fitting a map into a viewport.
const MAX_FIT_ZOOM: f64 = 0.8;
/// Shrink slightly after fitting so edge strokes are not clipped.
const FIT_SHRINK: f64 = 0.95;
pub const DEFAULT_FIT_MARGIN: f64 = 100.0;

/// Branch colors, assigned to first-level nodes in order and inherited by
/// every descendant of that branch.
pub const BRANCH_PALETTE: [&str; 8] = [
    "#F9A825", "#E91E63", "#9C27B0", "#2196F3", "#009688", "#4CAF50", "#F44336", "#673AB7",
];

// =============================================================================
// CONFIG
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutVariant {
    /// Horizontal map with tight spacing and colored branches.
    #[default]
    Compact,
    /// Roomier spacing with larger labels.
    Classic,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub root_background: &'static str,
    pub root_text: &'static str,
    pub root_border: &'static str,
    pub node_background: &'static str,
    pub node_text: &'static str,
    pub neutral_border: &'static str,
    /// Draw first-level node borders in their branch color.
    pub branch_borders: bool,
    /// Font sizes for root, first level, and deeper nodes.
    pub font_sizes: [f64; 3],
}

/// Spacing constants for one layout variant.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// `k` in the weight multiplier `1 + level × k`.
    pub weight_level_factor: f64,
    /// Depth-axis base step is `max(depth_floor, depth_ceiling - maxDepth × depth_decay)`.
    pub depth_floor: f64,
    pub depth_ceiling: f64,
    pub depth_decay: f64,
    /// Added to the depth step per level of the parent.
    pub depth_level_extra: f64,
    /// Spread unit is `max(spread_min_unit, spread_base + level × spread_level_step
    /// + children × spread_child_step) × max(1, 1 + level × spread_level_multiplier)`.
    pub spread_min_unit: f64,
    pub spread_base: f64,
    pub spread_level_step: f64,
    pub spread_child_step: f64,
    pub spread_level_multiplier: f64,
    pub origin: Point,
    /// Label width hint: `max(text_min_width, chars × text_char_width)`.
    pub text_min_width: f64,
    pub text_char_width: f64,
    pub theme: Theme,
}

impl LayoutConfig {
    #[must_use]
    pub fn compact() -> Self {
        Self {
            weight_level_factor: 0.1,
            depth_floor: 350.0,
            depth_ceiling: 450.0,
            depth_decay: 10.0,
            depth_level_extra: 30.0,
            spread_min_unit: 80.0,
            spread_base: 70.0,
            spread_level_step: 15.0,
            spread_child_step: 8.0,
            spread_level_multiplier: 0.3,
            origin: Point { x: 50.0, y: 0.0 },
            text_min_width: 100.0,
            text_char_width: 8.0,
            theme: Theme {
                root_background: "#FFF8E1",
                root_text: "#000000",
                root_border: "#FF9800",
                node_background: "#FFFFFF",
                node_text: "#000000",
                neutral_border: "#DDDDDD",
                branch_borders: true,
                font_sizes: [16.0, 14.0, 14.0],
            },
        }
    }

    #[must_use]
    pub fn classic() -> Self {
        Self {
            weight_level_factor: 0.2,
            depth_floor: 400.0,
            depth_ceiling: 600.0,
            depth_decay: 30.0,
            depth_level_extra: 80.0,
            spread_min_unit: 250.0,
            spread_base: 150.0,
            spread_level_step: 50.0,
            spread_child_step: 20.0,
            spread_level_multiplier: 0.5,
            origin: Point { x: 0.0, y: 0.0 },
            text_min_width: 150.0,
            text_char_width: 12.0,
            theme: Theme {
                root_background: "#0EA5E9",
                root_text: "#FFFFFF",
                root_border: "#DDDDDD",
                node_background: "#FFFFFF",
                node_text: "#000000",
                neutral_border: "#DDDDDD",
                branch_borders: false,
                font_sizes: [18.0, 16.0, 15.0],
            },
        }
    }

    #[must_use]
    pub fn for_variant(variant: LayoutVariant) -> Self {
        match variant {
            LayoutVariant::Compact => Self::compact(),
            LayoutVariant::Classic => Self::classic(),
        }
    }

    /// Depth-axis base step, computed once per tree.
    #[must_use]
    pub fn depth_step(&self, max_depth: usize) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let depth = max_depth as f64;
        f64::max(self.depth_floor, self.depth_ceiling - depth * self.depth_decay)
    }

    /// Spread-axis unit for a node at `level` with `children` children.
    #[must_use]
    pub fn spread_unit(&self, level: usize, children: usize) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let (level, children) = (level as f64, children as f64);
        let base = f64::max(
            self.spread_min_unit,
            self.spread_base + level * self.spread_level_step + children * self.spread_child_step,
        );
        base * f64::max(1.0, 1.0 + level * self.spread_level_multiplier)
    }

    #[must_use]
    pub fn text_width(&self, text: &str) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let chars = text.chars().count() as f64;
        f64::max(self.text_min_width, chars * self.text_char_width)
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::compact()
    }
}

// =============================================================================
// OUTPUT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeStyle {
    pub background: String,
    pub text_color: String,
    pub border: String,
    pub font_size: f64,
    pub bold: bool,
    pub min_width: f64,
}

/// Half-open interval on the spread axis allocated to a node by its parent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Span {
    pub start: f64,
    pub end: f64,
}

#[cfg(test)]
impl Span {
    pub fn extent(&self) -> f64 {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutNode {
    pub id: String,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub depth: usize,
    /// Palette index of the first-level branch this node belongs to; `None`
    /// for the root.
    pub branch: Option<usize>,
    pub color: String,
    pub weight: f64,
    pub span: Span,
    pub style: NodeStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub color: String,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

/// Viewport transform that fits a whole map into a container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Bounds {
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Fit the bounds (grown by `margin` on every side) into a
    /// `container_w × container_h` viewport, centered, never zooming past 0.8.
    #[must_use]
    pub fn fit(&self, container_w: f64, container_h: f64, margin: f64) -> Viewport {
        let min_x = self.min_x - margin;
        let min_y = self.min_y - margin;
        let width = self.width() + 2.0 * margin;
        let height = self.height() + 2.0 * margin;

        let scale = f64::min(MAX_FIT_ZOOM, f64::min(container_w / width, container_h / height));
        Viewport {
            x: -min_x * scale + (container_w - width * scale) / 2.0,
            y: -min_y * scale + (container_h - height * scale) / 2.0,
            zoom: scale * FIT_SHRINK,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
    pub bounds: Bounds,
}

// =============================================================================
// ENTRY POINT
// =============================================================================

/// Lay out `root` with `config`. Nodes are emitted in pre-order, edges in
/// the order their child nodes are placed.
#[must_use]
pub fn layout(root: &MindMapNode, config: &LayoutConfig) -> Layout {
    let weighed = weigh(root, 0, config.weight_level_factor);
    let depth_step = config.depth_step(root.max_depth());

    let mut out = Placement { config, depth_step, nodes: Vec::new(), edges: Vec::new() };
    let root_span = {
        let half = children_span(&weighed, config.spread_unit(0, weighed.children.len())) / 2.0;
        Span { start: config.origin.y - half, end: config.origin.y + half }
    };
    out.place(&weighed, config.origin, 0, None, root_span);

    let bounds = bounds_of(&out.nodes);
    Layout { nodes: out.nodes, edges: out.edges, bounds }
}

// =============================================================================
// PASS 1: SUBTREE WEIGHTS
// =============================================================================

struct Weighed<'a> {
    node: &'a MindMapNode,
    weight: f64,
    children: Vec<Weighed<'a>>,
}

fn weigh(node: &MindMapNode, level: usize, level_factor: f64) -> Weighed<'_> {
    if node.is_leaf() {
        return Weighed { node, weight: 1.0, children: Vec::new() };
    }

    let children: Vec<Weighed<'_>> = node
        .children
        .iter()
        .map(|c| weigh(c, level + 1, level_factor))
        .collect();
    let total: f64 = children.iter().map(|c| c.weight).sum();

    #[allow(clippy::cast_precision_loss)]
    let factor = f64::max(1.0, 1.0 + level as f64 * level_factor);
    Weighed { node, weight: f64::max(1.0, total * factor), children }
}

fn children_span(weighed: &Weighed<'_>, unit: f64) -> f64 {
    weighed.children.iter().map(|c| c.weight).sum::<f64>() * unit
}

// =============================================================================
// PASS 2: PLACEMENT
// =============================================================================

struct Placement<'c> {
    config: &'c LayoutConfig,
    depth_step: f64,
    nodes: Vec<LayoutNode>,
    edges: Vec<LayoutEdge>,
}

impl Placement<'_> {
    fn place(&mut self, w: &Weighed<'_>, pos: Point, level: usize, branch: Option<usize>, span: Span) {
        let color = branch_color(branch, &self.config.theme);
        self.nodes.push(LayoutNode {
            id: w.node.id.clone(),
            text: w.node.text.clone(),
            x: pos.x,
            y: pos.y,
            depth: level,
            branch,
            color: color.to_string(),
            weight: w.weight,
            span,
            style: self.style_for(&w.node.text, level, color),
        });

        if w.children.is_empty() {
            return;
        }

        let unit = self.config.spread_unit(level, w.children.len());
        #[allow(clippy::cast_precision_loss)]
        let step_x = self.depth_step + level as f64 * self.config.depth_level_extra;
        let mut cursor = pos.y - children_span(w, unit) / 2.0;

        for (i, child) in w.children.iter().enumerate() {
            let extent = child.weight * unit;
            let child_span = Span { start: cursor, end: cursor + extent };
            let child_pos = Point { x: pos.x + step_x, y: cursor + extent / 2.0 };
            let child_branch = if level == 0 { Some(i % BRANCH_PALETTE.len()) } else { branch };

            self.edges.push(LayoutEdge {
                id: format!("{}-{}", w.node.id, child.node.id),
                source: w.node.id.clone(),
                target: child.node.id.clone(),
                color: branch_color(child_branch, &self.config.theme).to_string(),
                stroke_width: if level <= 1 { 2.5 } else { 2.0 },
            });

            self.place(child, child_pos, level + 1, child_branch, child_span);
            cursor += extent;
        }
    }

    fn style_for(&self, text: &str, level: usize, color: &str) -> NodeStyle {
        let theme = &self.config.theme;
        let (background, text_color, border) = match level {
            0 => (theme.root_background, theme.root_text, theme.root_border),
            1 if theme.branch_borders => (theme.node_background, theme.node_text, color),
            _ => (theme.node_background, theme.node_text, theme.neutral_border),
        };
        NodeStyle {
            background: background.to_string(),
            text_color: text_color.to_string(),
            border: border.to_string(),
            font_size: theme.font_sizes[level.min(2)],
            bold: level == 0,
            min_width: self.config.text_width(text),
        }
    }
}

fn branch_color(branch: Option<usize>, theme: &Theme) -> &'static str {
    match branch {
        Some(i) => BRANCH_PALETTE[i % BRANCH_PALETTE.len()],
        None => theme.root_border,
    }
}

fn bounds_of(nodes: &[LayoutNode]) -> Bounds {
    let mut bounds = Bounds {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };
    for node in nodes {
        bounds.min_x = bounds.min_x.min(node.x);
        bounds.min_y = bounds.min_y.min(node.y);
        bounds.max_x = bounds.max_x.max(node.x + node.style.min_width);
        bounds.max_y = bounds.max_y.max(node.y + NODE_HEIGHT);
    }
    bounds
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod tests;
