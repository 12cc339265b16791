/// Integration tests for scene snapshots crossing the codec
/// These tests verify that every node variant and resource survives
/// encode/decode and that object IDs follow traversal order

use proptest::prelude::*;

use scenesync_shared::{
    decode, decode_nodes, encode, encode_category, CameraNode, GeoNode, LightNode, LightType,
    NodeCommon, NodeName, SceneCategory, SceneData, SceneHeader, SceneNode, SceneTree,
    MAX_SKIN_BONES, NODE_NAME_LENGTH,
};
use scenesync_test::{
    camera, geo, group, sample_scene, skinned_geo, three_node_scene, TestSceneBuilder,
};

fn round_trip(scene: &SceneData) -> SceneData {
    let buffers = encode(scene).expect("scene should encode");
    decode(&buffers).expect("scene should decode")
}

fn single(node: SceneNode) -> SceneData {
    TestSceneBuilder::new().root(SceneTree::leaf(node)).build()
}

#[test]
fn every_node_variant_round_trips() {
    let variants = vec![
        group("group"),
        geo("geo", 3),
        skinned_geo("skinned", 0, 12),
        SceneNode::Light(LightNode {
            light_type: LightType::Spot,
            angle: 45.0,
            range: 12.5,
            ..LightNode::default()
        }),
        camera("camera"),
    ];

    for node in variants {
        let scene = single(node.clone());
        let decoded = round_trip(&scene);
        assert_eq!(decoded.nodes, vec![node]);
    }
}

#[test]
fn empty_name_round_trips() {
    let scene = single(SceneNode::Group(NodeCommon::named("")));

    let decoded = round_trip(&scene);

    assert!(decoded.nodes[0].common().name.is_empty());
    assert_eq!(decoded.nodes[0].name(), "");
}

#[test]
fn full_width_name_round_trips() {
    let name = "n".repeat(NODE_NAME_LENGTH);
    let scene = single(SceneNode::Geo(GeoNode {
        common: NodeCommon::named(&name),
        ..GeoNode::default()
    }));

    let decoded = round_trip(&scene);

    assert_eq!(decoded.nodes[0].name(), name);
    assert_eq!(decoded.nodes[0].common().name, NodeName::new(&name));
}

#[test]
fn overlong_name_is_truncated() {
    let name = "x".repeat(NODE_NAME_LENGTH + 10);

    let decoded = round_trip(&single(group(&name)));

    assert_eq!(decoded.nodes[0].name().len(), NODE_NAME_LENGTH);
}

#[test]
fn fully_skinned_mesh_round_trips() {
    let scene = single(skinned_geo("actor", 0, MAX_SKIN_BONES));

    let decoded = round_trip(&scene);

    let SceneNode::SkinnedGeo(skinned) = &decoded.nodes[0] else {
        panic!("node should stay skinned");
    };
    assert_eq!(skinned.skin.bind_pose_length, MAX_SKIN_BONES as i32);
    assert_eq!(skinned.skin.bone_ids[MAX_SKIN_BONES - 1], MAX_SKIN_BONES as i32 - 1);
    assert_eq!(decoded, scene);
}

#[test]
fn sample_scene_round_trips_with_resources() {
    let scene = sample_scene();

    let decoded = round_trip(&scene);

    assert_eq!(decoded, scene);
    assert_eq!(decoded.textures[0].width, 2);
    assert_eq!(decoded.materials[0].name, "wood");
}

#[test]
fn textures_without_dimensions_drop_them() {
    let mut scene = sample_scene();
    scene.header = SceneHeader::default();

    let decoded = round_trip(&scene);

    assert_eq!(decoded.textures[0].width, 0);
    assert_eq!(decoded.textures[0].data, scene.textures[0].data);
}

// Object IDs

#[test]
fn flat_scene_ids_follow_sibling_order() {
    let scene = TestSceneBuilder::new()
        .root(SceneTree::leaf(group("a")))
        .root(SceneTree::leaf(group("b")))
        .root(SceneTree::leaf(group("c")))
        .build();

    let decoded = round_trip(&scene);

    for (object_id, name) in ["a", "b", "c"].into_iter().enumerate() {
        assert_eq!(decoded.find_by_name(name), Some(object_id as i32));
    }
}

#[test]
fn deep_scene_ids_are_depth_first() {
    let scene = TestSceneBuilder::new()
        .root(SceneTree::with_children(
            group("root"),
            vec![SceneTree::with_children(
                group("middle"),
                vec![SceneTree::leaf(geo("leaf", 0))],
            )],
        ))
        .build();

    let decoded = round_trip(&scene);

    assert_eq!(decoded.find_by_name("root"), Some(0));
    assert_eq!(decoded.find_by_name("middle"), Some(1));
    assert_eq!(decoded.find_by_name("leaf"), Some(2));
    assert_eq!(decoded.path_of(2).as_deref(), Some("/root/middle/leaf"));
}

#[test]
fn mixed_siblings_keep_their_ids() {
    let scene = sample_scene();

    let decoded = round_trip(&scene);

    let expected = ["root", "set", "table", "chair", "actor", "sun", "main"];
    for (object_id, name) in expected.into_iter().enumerate() {
        assert_eq!(decoded.node(object_id as i32).map(SceneNode::name).as_deref(), Some(name));
    }
    assert_eq!(decoded.parents(), scene.parents());
    assert_eq!(decoded.to_trees(), scene.to_trees());
}

// Scenario 1

#[test]
fn three_node_scene_decodes_geo_and_light() {
    let scene = three_node_scene();

    let decoded = round_trip(&scene);

    assert_eq!(decoded.node_count(), 3);
    assert_eq!(decoded.nodes[0].child_count(), 2);
    assert_eq!(decoded.nodes[1].geo().map(|geo| geo.geo_id), Some(0));
    let light = decoded.nodes[2].light().expect("third node should be the light");
    assert_eq!(light.light_type, LightType::Directional);
    assert_eq!(light.intensity, 2.5);
    assert_eq!(light.color, [1.0, 1.0, 1.0]);
}

#[test]
fn nodes_buffer_decodes_alone() {
    let scene = three_node_scene();

    let bytes = encode_category(&scene, SceneCategory::Nodes).expect("nodes should encode");

    assert_eq!(decode_nodes(&bytes), Ok(scene.nodes));
}

// Property tests

fn arb_common() -> impl Strategy<Value = NodeCommon> {
    (
        any::<bool>(),
        prop::array::uniform3(-1000.0f32..1000.0),
        prop::array::uniform3(0.01f32..100.0),
        prop::array::uniform4(-1.0f32..1.0),
        "[a-zA-Z0-9_]{0,64}",
    )
        .prop_map(|(editable, position, scale, rotation, name)| NodeCommon {
            editable,
            child_count: 0,
            position,
            scale,
            rotation,
            name: NodeName::new(&name),
        })
}

fn arb_node() -> impl Strategy<Value = SceneNode> {
    prop_oneof![
        arb_common().prop_map(SceneNode::Group),
        (arb_common(), -1i32..8, -1i32..8).prop_map(|(common, geo_id, material_id)| {
            SceneNode::Geo(GeoNode {
                common,
                geo_id,
                material_id,
                ..GeoNode::default()
            })
        }),
        (arb_common(), 0.0f32..10.0).prop_map(|(common, intensity)| {
            SceneNode::Light(LightNode {
                common,
                intensity,
                ..LightNode::default()
            })
        }),
        (arb_common(), 10.0f32..120.0).prop_map(|(common, fov)| {
            SceneNode::Camera(CameraNode {
                common,
                fov,
                ..CameraNode::default()
            })
        }),
    ]
}

fn arb_tree() -> impl Strategy<Value = SceneTree> {
    arb_node()
        .prop_map(SceneTree::leaf)
        .prop_recursive(3, 24, 4, |inner| {
            (arb_node(), prop::collection::vec(inner, 0..4))
                .prop_map(|(node, children)| SceneTree::with_children(node, children))
        })
}

proptest! {
    #[test]
    fn arbitrary_scenes_round_trip(roots in prop::collection::vec(arb_tree(), 1..4)) {
        let scene = SceneData::from_trees(SceneHeader::default(), roots.clone());

        let decoded = round_trip(&scene);

        prop_assert_eq!(decoded.to_trees(), Ok(roots_with_counts(roots)));
        prop_assert_eq!(decoded, scene);
    }

    #[test]
    fn truncated_nodes_never_yield_the_full_scene(cut in 1usize..200) {
        let buffers = encode(&three_node_scene()).expect("scene should encode");
        let end = buffers.nodes.len().saturating_sub(cut);

        let result = decode_nodes(&buffers.nodes[..end]);

        // a cut tail never yields the full node list
        prop_assert!(result.map_or(true, |nodes| nodes.len() < 3));
    }
}

// from_trees rewrites child counts, so compare against the same rewrite
fn roots_with_counts(roots: Vec<SceneTree>) -> Vec<SceneTree> {
    roots.into_iter().map(with_counts).collect()
}

fn with_counts(tree: SceneTree) -> SceneTree {
    let SceneTree { mut node, children } = tree;
    node.common_mut().child_count = children.len() as i32;
    SceneTree::with_children(node, children.into_iter().map(with_counts).collect())
}
