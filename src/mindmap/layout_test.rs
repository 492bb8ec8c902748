//! Tests for the mind-map layout engine.

use super::*;

fn leaf(id: &str) -> MindMapNode {
    MindMapNode::new(id, id.to_uppercase())
}

fn node<'a>(layout: &'a Layout, id: &str) -> &'a LayoutNode {
    layout
        .nodes
        .iter()
        .find(|n| n.id == id)
        .unwrap_or_else(|| panic!("missing node {id}"))
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// root → [a → [a1, a2], b]
fn lopsided() -> MindMapNode {
    MindMapNode::new("root", "Root").with_children(vec![
        MindMapNode::new("a", "A").with_children(vec![leaf("a1"), leaf("a2")]),
        leaf("b"),
    ])
}

// =============================================================================
// SPACING FORMULAS
// =============================================================================

#[test]
fn depth_step_shrinks_with_depth_and_is_floored() {
    let cfg = LayoutConfig::compact();
    assert!(approx(cfg.depth_step(0), 450.0));
    assert!(approx(cfg.depth_step(5), 400.0));
    assert!(approx(cfg.depth_step(10), 350.0));
    assert!(approx(cfg.depth_step(40), 350.0));
}

#[test]
fn spread_unit_grows_with_level_and_child_count() {
    let cfg = LayoutConfig::compact();
    // Floor wins for a single child at the root.
    assert!(approx(cfg.spread_unit(0, 1), 80.0));
    assert!(approx(cfg.spread_unit(0, 3), 94.0));
    assert!(approx(cfg.spread_unit(1, 2), 101.0 * 1.3));
    assert!(cfg.spread_unit(2, 2) > cfg.spread_unit(1, 2));
    assert!(cfg.spread_unit(1, 6) > cfg.spread_unit(1, 2));
}

#[test]
fn text_width_hint_has_floor() {
    let cfg = LayoutConfig::compact();
    assert!(approx(cfg.text_width("Rust"), 100.0));
    assert!(approx(cfg.text_width(&"x".repeat(20)), 160.0));
}

// =============================================================================
// PLACEMENT
// =============================================================================

#[test]
fn lone_root_sits_at_origin_without_edges() {
    let cfg = LayoutConfig::compact();
    let out = layout(&leaf("root"), &cfg);
    assert_eq!(out.nodes.len(), 1);
    assert!(out.edges.is_empty());
    let root = &out.nodes[0];
    assert!(approx(root.x, cfg.origin.x));
    assert!(approx(root.y, cfg.origin.y));
    assert_eq!(root.depth, 0);
    assert_eq!(root.branch, None);
    assert!(approx(root.weight, 1.0));
}

#[test]
fn flat_children_split_span_evenly() {
    let tree = MindMapNode::new("root", "Root").with_children(vec![leaf("a"), leaf("b"), leaf("c")]);
    let out = layout(&tree, &LayoutConfig::compact());

    let (a, b, c) = (node(&out, "a"), node(&out, "b"), node(&out, "c"));
    assert!(approx(a.y, -94.0));
    assert!(approx(b.y, 0.0));
    assert!(approx(c.y, 94.0));
    for child in [a, b, c] {
        assert!(approx(child.x, 50.0 + 440.0));
        assert!(approx(child.span.extent(), 94.0));
    }
    assert!(approx(node(&out, "root").weight, 3.0));
}

#[test]
fn single_child_span_is_its_own_weight() {
    let tree = MindMapNode::new("root", "Root").with_children(vec![leaf("only")]);
    let cfg = LayoutConfig::compact();
    let out = layout(&tree, &cfg);
    let only = node(&out, "only");
    assert!(approx(only.span.extent(), only.weight * cfg.spread_unit(0, 1)));
    assert!(approx(only.y, 0.0));
}

#[test]
fn heavier_subtree_gets_more_room() {
    let out = layout(&lopsided(), &LayoutConfig::compact());
    let (a, b) = (node(&out, "a"), node(&out, "b"));

    assert!(approx(a.weight, 2.2));
    assert!(approx(b.weight, 1.0));
    assert!(approx(node(&out, "root").weight, 3.2));
    assert!(a.span.extent() > b.span.extent());
    assert!(approx(a.span.extent(), 2.2 * 86.0));
    assert!(approx(a.y, -43.0));
    assert!(approx(b.y, 94.6));
}

#[test]
fn grandchildren_use_deeper_unit_and_step() {
    let out = layout(&lopsided(), &LayoutConfig::compact());
    let (a, a1, a2) = (node(&out, "a"), node(&out, "a1"), node(&out, "a2"));

    // maxDepth 2 → base step 430; level-1 parents add 30.
    assert!(approx(a.x, 480.0));
    assert!(approx(a1.x, 480.0 + 460.0));
    assert!(approx(a1.y, -43.0 - 65.65));
    assert!(approx(a2.y, -43.0 + 65.65));
    assert!(approx(f64::midpoint(a1.y, a2.y), a.y));
}

#[test]
fn sibling_spans_are_disjoint_and_in_input_order() {
    let tree = MindMapNode::new("root", "Root").with_children(vec![
        MindMapNode::new("a", "A").with_children(vec![leaf("a1"), leaf("a2"), leaf("a3")]),
        leaf("b"),
        MindMapNode::new("c", "C").with_children(vec![leaf("c1")]),
        leaf("d"),
    ]);
    let out = layout(&tree, &LayoutConfig::compact());

    let siblings: Vec<&LayoutNode> = ["a", "b", "c", "d"].iter().map(|id| node(&out, id)).collect();
    for pair in siblings.windows(2) {
        assert!(!pair[0].span.overlaps(&pair[1].span));
        assert!(pair[0].span.end <= pair[1].span.start + 1e-9);
        assert!(pair[0].y < pair[1].y);
    }
    for child in &siblings {
        assert!(approx(child.y, f64::midpoint(child.span.start, child.span.end)));
    }
}

#[test]
fn uniform_leaves_get_equal_disjoint_spans() {
    let children: Vec<MindMapNode> = (0..7).map(|i| leaf(&format!("n{i}"))).collect();
    let tree = MindMapNode::new("root", "Root").with_children(children);
    let out = layout(&tree, &LayoutConfig::classic());

    let leaves: Vec<&LayoutNode> = out.nodes.iter().filter(|n| n.depth == 1).collect();
    assert_eq!(leaves.len(), 7);
    for pair in leaves.windows(2) {
        assert!(approx(pair[0].span.extent(), pair[1].span.extent()));
        assert!(!pair[0].span.overlaps(&pair[1].span));
    }
}

#[test]
fn layout_is_deterministic() {
    let tree = lopsided();
    let cfg = LayoutConfig::compact();
    let first = layout(&tree, &cfg);
    let second = layout(&tree, &cfg);
    assert_eq!(first, second);
    for (x, y) in first.nodes.iter().zip(&second.nodes) {
        assert_eq!(x.x.to_bits(), y.x.to_bits());
        assert_eq!(x.y.to_bits(), y.y.to_bits());
    }
}

#[test]
fn text_change_does_not_move_nodes() {
    let tree = lopsided();
    let mut renamed = tree.clone();
    renamed.children[0].children[1].text = "A much, much longer label than before".into();

    let cfg = LayoutConfig::compact();
    let before = layout(&tree, &cfg);
    let after = layout(&renamed, &cfg);
    for (x, y) in before.nodes.iter().zip(&after.nodes) {
        assert_eq!((x.x, x.y), (y.x, y.y));
    }
    assert!(node(&after, "a2").style.min_width > node(&before, "a2").style.min_width);
}

#[test]
fn nodes_are_emitted_in_pre_order() {
    let out = layout(&lopsided(), &LayoutConfig::compact());
    let ids: Vec<&str> = out.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["root", "a", "a1", "a2", "b"]);
}

// =============================================================================
// EDGES & COLORS
// =============================================================================

#[test]
fn one_edge_per_parent_child_pair() {
    let out = layout(&lopsided(), &LayoutConfig::compact());
    let ids: Vec<&str> = out.edges.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["root-a", "a-a1", "a-a2", "root-b"]);
    assert_eq!(out.edges[1].source, "a");
    assert_eq!(out.edges[1].target, "a1");
}

#[test]
fn branch_color_is_inherited_by_descendants() {
    let out = layout(&lopsided(), &LayoutConfig::compact());
    assert_eq!(node(&out, "a").branch, Some(0));
    assert_eq!(node(&out, "a1").branch, Some(0));
    assert_eq!(node(&out, "b").branch, Some(1));
    assert_eq!(node(&out, "a2").color, BRANCH_PALETTE[0]);
    assert_eq!(node(&out, "b").color, BRANCH_PALETTE[1]);

    for edge in &out.edges {
        let target = node(&out, &edge.target);
        assert_eq!(edge.color, target.color);
    }
}

#[test]
fn branch_palette_wraps() {
    let children: Vec<MindMapNode> = (0..10).map(|i| leaf(&format!("n{i}"))).collect();
    let tree = MindMapNode::new("root", "Root").with_children(children);
    let out = layout(&tree, &LayoutConfig::compact());
    assert_eq!(node(&out, "n8").branch, Some(0));
    assert_eq!(node(&out, "n9").color, BRANCH_PALETTE[1]);
}

#[test]
fn stroke_width_thins_below_first_level() {
    let tree = MindMapNode::new("root", "Root").with_children(vec![
        MindMapNode::new("a", "A").with_children(vec![MindMapNode::new("a1", "A1").with_children(vec![leaf("x")])]),
    ]);
    let out = layout(&tree, &LayoutConfig::compact());
    let widths: Vec<f64> = out.edges.iter().map(|e| e.stroke_width).collect();
    assert_eq!(widths, vec![2.5, 2.5, 2.0]);
}

// =============================================================================
// STYLES & VARIANTS
// =============================================================================

#[test]
fn compact_styles_by_depth() {
    let out = layout(&lopsided(), &LayoutConfig::compact());
    let root = node(&out, "root");
    assert_eq!(root.style.background, "#FFF8E1");
    assert_eq!(root.style.border, "#FF9800");
    assert!(root.style.bold);
    assert!(approx(root.style.font_size, 16.0));

    assert_eq!(node(&out, "a").style.border, BRANCH_PALETTE[0]);
    assert_eq!(node(&out, "a1").style.border, "#DDDDDD");
    assert!(!node(&out, "a1").style.bold);
}

#[test]
fn classic_variant_uses_roomier_spacing() {
    let tree = MindMapNode::new("root", "Root").with_children(vec![leaf("a"), leaf("b")]);
    let out = layout(&tree, &LayoutConfig::for_variant(LayoutVariant::Classic));

    let root = node(&out, "root");
    assert!(approx(root.x, 0.0));
    assert_eq!(root.style.background, "#0EA5E9");
    assert_eq!(root.style.text_color, "#FFFFFF");
    assert!(approx(root.style.font_size, 18.0));

    let (a, b) = (node(&out, "a"), node(&out, "b"));
    assert!(approx(a.x, 570.0));
    assert!(approx(a.y, -125.0));
    assert!(approx(b.y, 125.0));
    assert_eq!(a.style.border, "#DDDDDD");
}

#[test]
fn variant_parses_from_lowercase() {
    let v: LayoutVariant = serde_json::from_str("\"classic\"").unwrap();
    assert_eq!(v, LayoutVariant::Classic);
    assert_eq!(LayoutVariant::default(), LayoutVariant::Compact);
}

// =============================================================================
// BOUNDS & FIT
// =============================================================================

#[test]
fn bounds_cover_node_boxes() {
    let out = layout(&leaf("root"), &LayoutConfig::compact());
    assert_eq!(out.bounds, Bounds { min_x: 50.0, min_y: 0.0, max_x: 150.0, max_y: 50.0 });
}

#[test]
fn fit_centers_and_never_zooms_in() {
    let bounds = Bounds { min_x: 50.0, min_y: 0.0, max_x: 150.0, max_y: 50.0 };
    let view = bounds.fit(1000.0, 800.0, DEFAULT_FIT_MARGIN);
    assert!(approx(view.x, 420.0));
    assert!(approx(view.y, 380.0));
    assert!(approx(view.zoom, 0.76));
}

#[test]
fn fit_shrinks_large_maps() {
    let bounds = Bounds { min_x: 0.0, min_y: -1000.0, max_x: 3800.0, max_y: 1000.0 };
    let view = bounds.fit(1000.0, 800.0, DEFAULT_FIT_MARGIN);
    assert!(approx(view.zoom, 0.25 * 0.95));
}
