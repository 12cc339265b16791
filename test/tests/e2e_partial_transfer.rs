/// E2E test: a bandwidth-limited client skips the auxiliary categories,
/// and a failed transfer keeps the previously received scene

use std::{fs, path::PathBuf};

use scenesync_client::{ClientConfig, SyncClient, SyncClientError, TransferError, TransferState};
use scenesync_server::SceneServer;
use scenesync_shared::{CodecError, SceneBuffers, SceneCache, SceneCategory};
use scenesync_test::{client_config, sample_scene, LocalNetwork};

fn skipping_config() -> ClientConfig {
    ClientConfig {
        skip_auxiliary: true,
        ..client_config(4)
    }
}

fn cache_directory(test: &str) -> PathBuf {
    let directory = std::env::temp_dir().join(format!("scenesync-{}-{}", test, std::process::id()));
    let _ = fs::remove_dir_all(&directory);
    directory
}

#[test]
fn skipped_categories_are_never_requested() {
    let _ = env_logger::builder().is_test(true).try_init();
    let network = LocalNetwork::new(SceneServer::from_scene(&sample_scene()).unwrap());
    let mut client = SyncClient::new(skipping_config(), network.clone());

    let scene = client
        .receive_scene(|_, _| {})
        .expect("transfer should succeed")
        .clone();

    assert_eq!(network.commands(), vec!["header", "objects", "nodes"]);
    assert!(scene.textures.is_empty());
    assert!(scene.materials.is_empty());
    assert!(scene.characters.is_empty());
    assert!(!scene.nodes.is_empty());
    assert_eq!(scene.objects.len(), 1);
    assert_eq!(client.transfer_state(), TransferState::Ready);
}

#[test]
fn full_transfer_requests_every_category_in_order() {
    let network = LocalNetwork::new(SceneServer::from_scene(&sample_scene()).unwrap());
    let mut client = SyncClient::new(client_config(4), network.clone());

    let scene = client.receive_scene(|_, _| {}).expect("transfer should succeed");

    assert_eq!(scene, &sample_scene());
    let expected: Vec<&str> = SceneCategory::TRANSFER_ORDER
        .iter()
        .map(|category| category.command())
        .collect();
    assert_eq!(network.commands(), expected);
}

#[test]
fn failed_transfer_keeps_previous_scene() {
    let _ = env_logger::builder().is_test(true).try_init();
    let network = LocalNetwork::new(SceneServer::from_scene(&sample_scene()).unwrap());
    let mut client = SyncClient::new(client_config(4), network.clone());
    client.receive_scene(|_, _| {}).expect("first transfer should succeed");

    let mut broken = network.scene_server().buffers();
    // a node tag no variant uses
    broken.nodes = 42i32.to_le_bytes().repeat(8);
    network.scene_server().set_buffers(broken);
    let result = client.receive_scene(|_, _| {});

    assert!(matches!(
        result,
        Err(SyncClientError::Transfer(TransferError::Decode(CodecError::MalformedBuffer {
            category: SceneCategory::Nodes,
            ..
        })))
    ));
    assert_eq!(client.transfer_state(), TransferState::Failed);
    assert_eq!(client.scene(), Some(&sample_scene()));
}

#[test]
fn received_scene_is_cached_and_reloads() {
    let directory = cache_directory("reload");
    let network = LocalNetwork::new(SceneServer::from_scene(&sample_scene()).unwrap());
    let config = ClientConfig {
        cache_directory: Some(directory.clone()),
        ..client_config(4)
    };
    let mut client = SyncClient::new(config, network.clone());
    client.receive_scene(|_, _| {}).expect("transfer should succeed");

    let mut offline = SyncClient::new(client_config(5), network.clone());
    let cache = SceneCache::new(&directory);
    let reloaded = offline
        .load_cached_scene(&cache, scenesync_client::LAST_SCENE_NAME)
        .expect("cached scene should load")
        .clone();

    assert_eq!(reloaded, sample_scene());
    let served = SceneServer::from_cache(&cache, scenesync_client::LAST_SCENE_NAME)
        .expect("cache should serve");
    assert_eq!(served.buffers(), network.scene_server().buffers());

    let _ = fs::remove_dir_all(&directory);
}

#[test]
fn empty_server_yields_an_empty_scene() {
    let network = LocalNetwork::new(SceneServer::new(SceneBuffers::default()));
    let mut client = SyncClient::new(client_config(4), network.clone());

    let scene = client.receive_scene(|_, _| {}).expect("empty buffers are valid");

    assert_eq!(scene.node_count(), 0);
}
