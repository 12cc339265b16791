/// E2E test: an update from one client is applied by another while the
/// sender's own copy of the broadcast is suppressed

use scenesync_server::SceneServer;
use scenesync_shared::{
    ApplyOutcome, LockCoordinator, LockMode, ParamType, ParameterUpdate, ParameterValue,
    UpdateApplier,
};
use scenesync_test::{connect_client, sample_scene, tick_until, LocalNetwork};

#[test]
fn position_update_reaches_peer_and_is_not_reapplied_by_sender() {
    let _ = env_logger::builder().is_test(true).try_init();
    let network = LocalNetwork::new(SceneServer::from_scene(&sample_scene()).unwrap());
    let mut client_a = connect_client(network.clone(), 7);
    let mut client_b = connect_client(network.clone(), 9);

    let outcome = client_a
        .edit(2, ParameterValue::Position([1.0, 2.0, 3.0]))
        .expect("edit should publish");
    assert_eq!(outcome, ApplyOutcome::Applied);

    let events_b = tick_until(&mut client_b, |_, events| {
        events.iter().any(|events| events.applied().contains(&(2, ParamType::Pos)))
    });
    assert!(events_b
        .iter()
        .any(|events| events.applied().contains(&(2, ParamType::Pos))));
    let position = client_b.scene().unwrap().node(2).unwrap().common().position;
    assert_eq!(position, [1.0, 2.0, 3.0]);

    let events_a = tick_until(&mut client_a, |_, events| {
        events.iter().any(|events| events.echoes() > 0)
    });
    assert_eq!(events_a.iter().map(|events| events.echoes()).sum::<usize>(), 1);
    assert!(events_a.iter().all(|events| events.applied().is_empty()));
}

#[test]
fn own_broadcast_leaves_scene_untouched() {
    let mut scene = sample_scene();
    let applier = UpdateApplier::new(7, LockCoordinator::new(LockMode::Advisory));
    let frame = ParameterUpdate::new(7, 2, ParameterValue::Position([1.0, 2.0, 3.0])).encode();

    // the local value moved on before the echo arrived
    scene.node_mut(2).unwrap().common_mut().position = [5.0, 5.0, 5.0];
    let outcome = applier.apply_frame(&mut scene, &frame);

    assert_eq!(outcome, Ok(ApplyOutcome::EchoSuppressed));
    assert_eq!(scene.node(2).unwrap().common().position, [5.0, 5.0, 5.0]);
}

#[test]
fn peer_applies_the_same_frame() {
    let mut scene = sample_scene();
    let applier = UpdateApplier::new(9, LockCoordinator::new(LockMode::Advisory));
    let frame = ParameterUpdate::new(7, 2, ParameterValue::Position([1.0, 2.0, 3.0])).encode();

    let outcome = applier.apply_frame(&mut scene, &frame);

    assert_eq!(outcome, Ok(ApplyOutcome::Applied));
    assert_eq!(scene.node(2).unwrap().common().position, [1.0, 2.0, 3.0]);
}
