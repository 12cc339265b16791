/// E2E test: a three node scene travels through the scene server and
/// comes back intact on the client side

use scenesync_client::{SyncClient, TransferState};
use scenesync_server::SceneServer;
use scenesync_shared::{decode, LightType, SceneCategory};
use scenesync_test::{client_config, three_node_scene, LocalNetwork};

#[test]
fn scene_server_replies_decode_to_the_encoded_scene() {
    let scene = three_node_scene();
    let server = SceneServer::from_scene(&scene).expect("scene should encode");

    let mut buffers = server.buffers();
    for category in SceneCategory::TRANSFER_ORDER {
        buffers.set(category, server.respond(category.command().as_bytes()));
    }
    let decoded = decode(&buffers).expect("replies should decode");

    assert_eq!(decoded.node_count(), 3);
    assert_eq!(decoded.nodes[1].geo().map(|geo| geo.geo_id), Some(0));
    assert_eq!(decoded.nodes[2].light().map(|light| light.intensity), Some(2.5));
}

#[test]
fn client_receives_group_geo_and_light() {
    let _ = env_logger::builder().is_test(true).try_init();
    let network = LocalNetwork::new(SceneServer::from_scene(&three_node_scene()).unwrap());
    let mut client = SyncClient::new(client_config(3), network.clone());
    let mut reported = Vec::new();

    let scene = client
        .receive_scene(|fraction, label| reported.push((fraction, label.to_string())))
        .expect("transfer should succeed")
        .clone();

    assert_eq!(scene.node_count(), 3);
    assert_eq!(scene.nodes[0].child_count(), 2);
    assert_eq!(scene.nodes[1].geo().unwrap().geo_id, 0);
    let light = scene.nodes[2].light().unwrap();
    assert_eq!(light.light_type, LightType::Directional);
    assert_eq!(light.intensity, 2.5);
    assert_eq!(light.color, [1.0, 1.0, 1.0]);
    assert_eq!(scene.objects.len(), 1);

    assert_eq!(client.transfer_state(), TransferState::Ready);
    assert!(reported.windows(2).all(|pair| pair[0].0 <= pair[1].0));
    assert_eq!(reported.last().map(|(fraction, _)| *fraction), Some(1.0));
}
