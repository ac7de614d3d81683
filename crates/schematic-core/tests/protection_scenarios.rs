// crates/schematic-core/tests/protection_scenarios.rs
//
// End-to-end scenarios for fingerprinting, watermarking, integrity, and
// similarity, driven only through the public API.

use proptest::prelude::*;
use rand::seq::SliceRandom;

use rand::RngCore;
use schematic_core::rng;
use schematic_core::{
    check_integrity, fingerprint, protect, score, watermark, Asset, AssetIdentity, Node, NodeId,
    ProtectionConfig, SceneTree, Vec3,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const ALICE_ID: &str = "6fa459ea-ee8a-3ca4-894e-db77e160355e";
const BOB_ID: &str = "886313e1-3b8a-5372-9b90-0c9aee199e5d";

/// Five primitives of mixed types hanging directly off the root.
fn five_primitive_tree() -> SceneTree {
    let mut tree = SceneTree::new(Node::new("Outpost"));
    let root = tree.root();
    let parts = [
        ("Floor", "Plane", Vec3::new(0.0, 0.0, 0.0)),
        ("WallNorth", "Cube", Vec3::new(0.0, 1.5, 4.0)),
        ("WallSouth", "Cube", Vec3::new(0.0, 1.5, -4.0)),
        ("Lamp", "Sphere", Vec3::new(1.25, 3.0, 0.5)),
        ("Pipe", "Cylinder", Vec3::new(-2.0, 0.75, 1.0)),
    ];
    for (name, mesh, position) in parts {
        tree.add_child(
            root,
            Node::new(name)
                .with_mesh(mesh)
                .with_material("Concrete")
                .at(position),
        )
        .unwrap();
    }
    tree
}

fn child_named(tree: &SceneTree, name: &str) -> NodeId {
    tree.find_child(tree.root(), name).unwrap()
}

fn moved(tree: &SceneTree, name: &str, dx: f32) -> SceneTree {
    let mut copy = tree.clone();
    let id = child_named(&copy, name);
    copy.node_mut(id).unwrap().transform.position.x += dx;
    copy
}

fn tree_at(positions: &[(f32, f32, f32)]) -> SceneTree {
    let mut tree = SceneTree::new(Node::new("Root"));
    let root = tree.root();
    for (i, &(x, y, z)) in positions.iter().enumerate() {
        tree.add_child(root, Node::new(format!("P{}", i)).with_mesh("Cube").at(Vec3::new(x, y, z)))
            .unwrap();
    }
    tree
}

// ---------------------------------------------------------------------------
// Fingerprint properties
// ---------------------------------------------------------------------------

#[test]
fn fingerprint_is_deterministic() {
    let tree = five_primitive_tree();
    let first = fingerprint::compute(&tree).unwrap();
    let second = fingerprint::compute(&tree).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 64);
}

#[test]
fn fingerprint_detects_moves_beyond_half_quantum() {
    let tree = five_primitive_tree();
    let base = fingerprint::compute(&tree).unwrap();

    // WallNorth sits at x = 0.0; Lamp at x = 1.25.
    for dx in [0.0006f32, 0.001, -0.0007, 0.01] {
        let changed = fingerprint::compute(&moved(&tree, "WallNorth", dx)).unwrap();
        assert_ne!(base, changed, "move of {} must change the fingerprint", dx);
        let changed = fingerprint::compute(&moved(&tree, "Lamp", dx)).unwrap();
        assert_ne!(base, changed, "move of {} must change the fingerprint", dx);
    }
}

#[test]
fn fingerprint_absorbs_sub_rounding_noise() {
    let tree = five_primitive_tree();
    let base = fingerprint::compute(&tree).unwrap();

    for dx in [0.00005f32, -0.00009, 0.0000001] {
        assert_eq!(base, fingerprint::compute(&moved(&tree, "WallNorth", dx)).unwrap());
        assert_eq!(base, fingerprint::compute(&moved(&tree, "Lamp", dx)).unwrap());
    }
}

#[test]
fn fingerprint_ignores_sibling_order() {
    let tree = five_primitive_tree();
    let base = fingerprint::compute(&tree).unwrap();

    let root = tree.root();
    let mut order = tree.node(root).unwrap().children().to_vec();
    let mut rng = rng::seeded(2024);
    for _ in 0..5 {
        order.shuffle(&mut rng);
        let mut reordered = tree.clone();
        reordered.reorder_children(root, order.clone()).unwrap();
        assert_eq!(base, fingerprint::compute(&reordered).unwrap());
    }

    let mut reversed = tree.clone();
    let mut rev = tree.node(root).unwrap().children().to_vec();
    rev.reverse();
    reversed.reorder_children(root, rev).unwrap();
    assert_eq!(base, fingerprint::compute(&reversed).unwrap());
}

/// Root -> two groups, each with two leaf primitives.
fn grouped_tree() -> SceneTree {
    let mut tree = SceneTree::new(Node::new("Yard"));
    let root = tree.root();
    let east = tree.add_child(root, Node::new("East").at(Vec3::new(5.0, 0.0, 0.0))).unwrap();
    let west = tree.add_child(root, Node::new("West").at(Vec3::new(-5.0, 0.0, 0.0))).unwrap();
    tree.add_child(east, Node::new("Crate").with_mesh("Cube").at(Vec3::new(1.0, 0.0, 0.0))).unwrap();
    tree.add_child(east, Node::new("Barrel").with_mesh("Cylinder").at(Vec3::new(0.0, 0.0, 1.0))).unwrap();
    tree.add_child(west, Node::new("Rock").with_mesh("Sphere").at(Vec3::new(2.0, 0.0, 0.0))).unwrap();
    tree.add_child(west, Node::new("Slab").with_mesh("Plane").at(Vec3::new(0.0, 0.0, 2.0))).unwrap();
    tree
}

fn reversed_children(tree: &SceneTree, parent: NodeId) -> SceneTree {
    let mut copy = tree.clone();
    let order: Vec<NodeId> = tree.node(parent).unwrap().children().iter().rev().copied().collect();
    copy.reorder_children(parent, order).unwrap();
    copy
}

#[test]
fn fingerprint_ignores_leaf_order_below_the_root() {
    let tree = grouped_tree();
    let base = fingerprint::compute(&tree).unwrap();
    let east = child_named(&tree, "East");
    assert_eq!(base, fingerprint::compute(&reversed_children(&tree, east)).unwrap());
}

#[test]
fn reordering_subtrees_shifts_parent_indices() {
    // Leaves keep their attributes, but their parents are discovered in a
    // different order, so every leaf's parent_index line changes.
    let tree = grouped_tree();
    let base = fingerprint::compute(&tree).unwrap();
    let swapped = reversed_children(&tree, tree.root());
    assert_ne!(base, fingerprint::compute(&swapped).unwrap());
}

#[test]
fn fingerprint_sees_structure_changes() {
    let tree = five_primitive_tree();
    let base = fingerprint::compute(&tree).unwrap();

    let mut extra = tree.clone();
    let root = extra.root();
    extra.add_child(root, Node::new("Empty")).unwrap();
    assert_ne!(base, fingerprint::compute(&extra).unwrap());

    let mut fewer = tree.clone();
    let lamp = child_named(&fewer, "Lamp");
    fewer.remove_subtree(lamp).unwrap();
    assert_ne!(base, fingerprint::compute(&fewer).unwrap());
}

proptest! {
    #[test]
    fn grid_positions_survive_small_jitter(
        points in prop::collection::vec(
            (-50_000i32..50_000, -50_000i32..50_000, -50_000i32..50_000,
             -0.00009f32..0.00009, -0.00009f32..0.00009, -0.00009f32..0.00009),
            1..8,
        )
    ) {
        let exact: Vec<(f32, f32, f32)> = points
            .iter()
            .map(|&(x, y, z, ..)| (x as f32 / 1000.0, y as f32 / 1000.0, z as f32 / 1000.0))
            .collect();
        let jittered: Vec<(f32, f32, f32)> = points
            .iter()
            .zip(&exact)
            .map(|(&(.., jx, jy, jz), &(x, y, z))| (x + jx, y + jy, z + jz))
            .collect();

        prop_assert_eq!(
            fingerprint::compute(&tree_at(&exact)).unwrap(),
            fingerprint::compute(&tree_at(&jittered)).unwrap()
        );
    }
}

// ---------------------------------------------------------------------------
// Watermark properties
// ---------------------------------------------------------------------------

#[test]
fn seed_derivation_is_pure() {
    assert_eq!(watermark::seed(ALICE_ID, "alice"), watermark::seed(ALICE_ID, "alice"));
    assert_ne!(watermark::seed(ALICE_ID, "alice"), watermark::seed(BOB_ID, "alice"));

    let mut a = rng::seeded(watermark::seed(ALICE_ID, "alice"));
    let mut b = rng::seeded(watermark::seed(ALICE_ID, "alice"));
    for _ in 0..32 {
        assert_eq!(a.next_u32(), b.next_u32());
    }
}

#[test]
fn same_identity_on_different_trees_shares_marker_prefix() {
    let mut small = Asset::new(AssetIdentity::new(ALICE_ID, "alice"), "small", tree_at(&[(1.0, 0.0, 0.0)]));
    let mut large = Asset::new(AssetIdentity::new(ALICE_ID, "alice"), "large", five_primitive_tree());

    let a = watermark::apply(&mut small).unwrap();
    let b = watermark::apply(&mut large).unwrap();

    // Markers come first in the stream, so they agree; offsets draw from
    // different pools.
    let markers_a: Vec<_> = a.iter().filter(|op| op.starts_with('m')).collect();
    let markers_b: Vec<_> = b.iter().filter(|op| op.starts_with('m')).collect();
    assert_eq!(markers_a, markers_b);
    assert_ne!(a, b);
}

#[test]
fn verify_detects_container_removal_but_not_marker_removal() {
    let mut asset = Asset::new(AssetIdentity::new(ALICE_ID, "alice"), "outpost", five_primitive_tree());
    watermark::apply(&mut asset).unwrap();
    assert!(watermark::verify(&asset));

    let container = child_named(asset.tree(), "_wm_6fa459ea");
    let markers = asset.tree().node(container).unwrap().children().to_vec();
    for marker in &markers[1..] {
        asset.tree_mut().remove_subtree(*marker).unwrap();
    }
    assert!(watermark::verify(&asset), "presence check only looks at the container");

    asset.tree_mut().remove_subtree(container).unwrap();
    assert!(!watermark::verify(&asset));
}

#[test]
fn duplicate_records_are_pinned() {
    let a = vec!["m0:0.5,0.5,0.5".to_string(); 3];
    let b = vec!["m0:0.5,0.5,0.5".to_string(), "m1:0,0,0".to_string()];
    // All three copies in `a` match b[0]; divided by max(3, 2).
    assert_eq!(watermark::compare(&a, &b), 1.0);
    // One match from `b`, over 3.
    assert!((watermark::compare(&b, &a) - 1.0 / 3.0).abs() < 1e-6);
}

// ---------------------------------------------------------------------------
// Similarity and integrity
// ---------------------------------------------------------------------------

#[test]
fn independently_watermarked_copies_are_similar() {
    let config = ProtectionConfig::default();
    let mut first = Asset::new(AssetIdentity::new(ALICE_ID, "alice"), "outpost", five_primitive_tree());
    let mut second = Asset::new(AssetIdentity::new(ALICE_ID, "alice"), "outpost", five_primitive_tree());
    protect(&mut first, false).unwrap();
    protect(&mut second, false).unwrap();

    let report = score(&first, &second, &config).unwrap();
    assert_eq!(report.geometric, 1.0);
    assert!(report.overall >= config.similarity_threshold);
    assert!(report.decision);
    assert!(!report.creators_differ);
}

#[test]
fn unrelated_assets_are_different() {
    let config = ProtectionConfig::default();
    let mut first = Asset::new(AssetIdentity::new(ALICE_ID, "alice"), "outpost", five_primitive_tree());
    let mut second = Asset::new(
        AssetIdentity::new(BOB_ID, "bob"),
        "shed",
        tree_at(&[(10.0, 0.0, 0.0), (12.0, 0.0, 0.0)]),
    );
    protect(&mut first, false).unwrap();
    protect(&mut second, false).unwrap();

    let report = score(&first, &second, &config).unwrap();
    assert_eq!(report.geometric, 0.0);
    assert!(report.watermark < 0.05);
    assert!(!report.decision);
    assert!(report.creators_differ);
}

#[test]
fn watermarking_invalidates_earlier_fingerprint() {
    let mut asset = Asset::new(AssetIdentity::new(ALICE_ID, "alice"), "outpost", five_primitive_tree());
    let before_tree = asset.tree().clone();

    let before = fingerprint::update(&mut asset).unwrap();
    assert!(fingerprint::verify(&asset));

    let record = watermark::apply(&mut asset).unwrap();
    let after = fingerprint::compute(asset.tree()).unwrap();
    assert_ne!(before, after);
    assert!(!fingerprint::verify(&asset), "hash taken before embedding is stale");
    assert!(!check_integrity(&asset).is_intact());

    // Every primitive stays within the accumulated micro-offset bound.
    let bound = watermark::MAX_OFFSET * watermark::MAX_OFFSET_TARGETS as f32 + 1e-6;
    for &child in before_tree.node(before_tree.root()).unwrap().children() {
        let original = before_tree.node(child).unwrap().transform.position;
        let now = asset.tree().node(child).unwrap().transform.position;
        assert!((now.x - original.x).abs() <= bound);
        assert!((now.y - original.y).abs() <= bound);
        assert!((now.z - original.z).abs() <= bound);
    }
    let offsets = record.iter().filter(|op| op.starts_with("o:")).count();
    assert_eq!(offsets, 5);

    // Re-fingerprinting after embedding restores integrity.
    fingerprint::update(&mut asset).unwrap();
    assert!(check_integrity(&asset).is_intact());
}

#[test]
fn protected_asset_survives_json_roundtrip() {
    let mut asset = Asset::new(AssetIdentity::new(ALICE_ID, "alice"), "outpost", five_primitive_tree());
    protect(&mut asset, false).unwrap();

    let restored = Asset::from_json(&asset.to_json().unwrap()).unwrap();
    assert!(check_integrity(&restored).is_intact());
    assert_eq!(restored.watermark_data(), asset.watermark_data());
}
