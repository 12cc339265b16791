/// Integration tests for live updates crossing the relay
/// These tests verify lock propagation, lock enforcement per mode, lock
/// release on disconnect and resend handling between real clients

use std::sync::Arc;

use scenesync_client::{SyncClient, SyncClientError};
use scenesync_server::SceneServer;
use scenesync_shared::{
    Connector, LockMode, LockTransition, ParamType, ParameterUpdate, ParameterValue, UpdateError,
};
use scenesync_test::{client_config, connect_client, tick_until, wait_until, LocalNetwork, sample_scene};

const A: u8 = 7;
const B: u8 = 9;
const TABLE: i32 = 2;

fn network() -> Arc<LocalNetwork> {
    let _ = env_logger::builder().is_test(true).try_init();
    let scene = SceneServer::from_scene(&sample_scene()).expect("sample scene should encode");
    LocalNetwork::new(scene)
}

fn connect_with_mode(network: &Arc<LocalNetwork>, sender_id: u8, lock_mode: LockMode) -> SyncClient {
    let config = scenesync_client::ClientConfig {
        lock_mode,
        ..client_config(sender_id)
    };
    let mut client = SyncClient::new(config, network.clone());
    client
        .receive_scene(|_, _| {})
        .expect("scene transfer should succeed");
    client.start_sync().expect("client should join the update bus");
    client
}

#[test]
fn lock_reaches_other_clients() {
    let network = network();
    let mut client_a = connect_client(network.clone(), A);
    let mut client_b = connect_client(network.clone(), B);

    client_a.lock(TABLE).expect("lock should publish");

    tick_until(&mut client_b, |client, _| client.locks().owner(TABLE) == Some(A));
    assert_eq!(client_b.locks().owner(TABLE), Some(A));
    assert_eq!(client_a.locked_object(), Some(TABLE));
    assert_eq!(network.sync_server().with_relay(|relay| relay.locks().owner(TABLE)), Some(A));

    client_a.unlock().expect("unlock should publish");

    tick_until(&mut client_b, |client, _| client.locks().owner(TABLE).is_none());
    assert_eq!(client_b.locks().owner(TABLE), None);
}

#[test]
fn advisory_edit_on_foreign_lock_is_applied_and_reported() {
    let network = network();
    let mut client_a = connect_client(network.clone(), A);
    let mut client_b = connect_client(network.clone(), B);
    client_a.lock(TABLE).expect("lock should publish");
    tick_until(&mut client_b, |client, _| client.locks().owner(TABLE) == Some(A));

    let outcome = client_b.edit(TABLE, ParameterValue::Position([4.0, 0.0, 0.0]));
    assert!(outcome.is_ok());

    let events = tick_until(&mut client_a, |_, events| {
        events.iter().any(|events| !events.advisory_violations().is_empty())
    });
    assert!(events
        .iter()
        .any(|events| events.advisory_violations().contains(&(TABLE, A))));
    let position = client_a.scene().unwrap().node(TABLE).unwrap().common().position;
    assert_eq!(position, [4.0, 0.0, 0.0]);
}

#[test]
fn strict_edit_on_foreign_lock_is_refused_locally() {
    let network = network();
    let mut client_a = connect_with_mode(&network, A, LockMode::Strict);
    let mut client_b = connect_with_mode(&network, B, LockMode::Strict);
    client_a.lock(TABLE).expect("lock should publish");
    tick_until(&mut client_b, |client, _| client.locks().owner(TABLE) == Some(A));

    let result = client_b.edit(TABLE, ParameterValue::Position([4.0, 0.0, 0.0]));

    assert_eq!(
        result,
        Err(SyncClientError::Update(UpdateError::LockRejected {
            object_id: TABLE,
            owner: A,
            editor: B,
        }))
    );
    let position = client_b.scene().unwrap().node(TABLE).unwrap().common().position;
    assert_eq!(position, [0.0, 0.0, 0.0]);
}

#[test]
fn departed_publisher_releases_its_locks() {
    let network = network();
    let mut client_b = connect_client(network.clone(), B);
    let endpoint = client_b.config().publish_endpoint();
    let mut publisher = network
        .connect_publisher(&endpoint)
        .expect("local publisher should connect");

    let lock = ParameterUpdate::new(5, TABLE, ParameterValue::Lock(true));
    publisher.send(&lock.encode()).expect("lock should send");
    tick_until(&mut client_b, |client, _| client.locks().owner(TABLE) == Some(5));
    assert_eq!(client_b.locks().owner(TABLE), Some(5));

    drop(publisher);

    let events = tick_until(&mut client_b, |client, _| client.locks().owner(TABLE).is_none());
    assert_eq!(client_b.locks().owner(TABLE), None);
    assert!(events.iter().any(|events| events
        .lock_changes()
        .contains(&(TABLE, 5, LockTransition::Released))));
}

#[test]
fn resend_request_republishes_held_objects() {
    let network = network();
    let mut client_a = connect_client(network.clone(), A);
    let mut client_b = connect_client(network.clone(), B);
    client_a.lock(TABLE).expect("lock should publish");
    tick_until(&mut client_b, |client, _| client.locks().owner(TABLE) == Some(A));

    client_b.request_resend().expect("resend request should publish");

    tick_until(&mut client_a, |_, events| {
        events.iter().any(|events| events.resend_requested())
    });
    let events = tick_until(&mut client_b, |_, events| {
        events
            .iter()
            .any(|events| events.applied().contains(&(TABLE, ParamType::Rot)))
    });
    assert!(events
        .iter()
        .any(|events| events.applied().contains(&(TABLE, ParamType::Rot))));
    assert!(network
        .sync_server()
        .with_relay(|relay| relay.cached_state(TABLE, ParamType::Scale).is_some()));
}

#[test]
fn relay_replays_cached_state_on_resend() {
    let network = network();
    let mut client_a = connect_client(network.clone(), A);
    client_a
        .edit(TABLE, ParameterValue::Scale([2.0, 2.0, 2.0]))
        .expect("edit should publish");
    assert!(wait_until(|| network
        .sync_server()
        .with_relay(|relay| relay.cached_state(TABLE, ParamType::Scale).is_some())));

    // joins after the edit, so only the replay can bring it up to date
    let mut client_b = connect_client(network.clone(), B);
    client_b.request_resend().expect("resend request should publish");

    tick_until(&mut client_b, |client, _| {
        client.scene().unwrap().node(TABLE).unwrap().common().scale == [2.0, 2.0, 2.0]
    });
    let scale = client_b.scene().unwrap().node(TABLE).unwrap().common().scale;
    assert_eq!(scale, [2.0, 2.0, 2.0]);
}

#[test]
fn pings_reach_every_client() {
    let network = network();
    let mut client_a = connect_client(network.clone(), A);
    let mut client_b = connect_client(network.clone(), B);

    client_a.ping().expect("ping should publish");

    let events = tick_until(&mut client_b, |_, events| events.iter().any(|events| events.pings() > 0));
    assert!(events.iter().any(|events| events.pings() > 0));
    assert!(client_a.tick().dropped().is_empty());
}
