/// E2E test: a full session over localhost TCP, from scene transfer
/// through live updates to shutdown

use std::{net::TcpStream, thread, time::Duration};

use scenesync_client::{ClientConfig, SyncClient};
use scenesync_server::{SceneServer, ServerConfig, TcpServer};
use scenesync_shared::{
    write_frame, FrameReceiver, ParamType, ParameterUpdate, ParameterValue, TcpFrameReceiver,
};
use scenesync_test::{client_config, sample_scene, tick_until, wait_until, WAIT_TIMEOUT};

fn local_config() -> ServerConfig {
    ServerConfig {
        bind_host: "127.0.0.1".to_string(),
        scene_port: 0,
        subscribe_port: 0,
        publish_port: 0,
        ..ServerConfig::default()
    }
}

fn server() -> TcpServer {
    server_with(local_config())
}

fn server_with(config: ServerConfig) -> TcpServer {
    let scene = SceneServer::from_scene(&sample_scene()).expect("sample scene should encode");
    let mut server = TcpServer::new(config, scene);
    server.listen().expect("server should bind ephemeral ports");
    server
}

fn tcp_client(server: &TcpServer, sender_id: u8) -> SyncClient {
    let config = ClientConfig {
        server_host: "127.0.0.1".to_string(),
        scene_port: server.scene_addr().expect("scene port bound").port(),
        subscribe_port: server.subscribe_addr().expect("subscribe port bound").port(),
        publish_port: server.publish_addr().expect("publish port bound").port(),
        ..client_config(sender_id)
    };
    let mut client = SyncClient::tcp(config);
    client
        .receive_scene(|_, _| {})
        .expect("scene transfer over TCP should succeed");
    client.start_sync().expect("client should join the update bus");
    client
}

#[test]
fn scene_and_updates_travel_over_tcp() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut server = server();
    let mut client_a = tcp_client(&server, 7);
    let mut client_b = tcp_client(&server, 9);
    assert_eq!(client_b.scene(), Some(&sample_scene()));

    // subscriptions are accepted asynchronously
    assert!(wait_until(|| server.sync_server().subscriber_count() == 2));

    client_a
        .edit(2, ParameterValue::Position([1.0, 2.0, 3.0]))
        .expect("edit should publish");

    let events = tick_until(&mut client_b, |_, events| {
        events.iter().any(|events| events.applied().contains(&(2, ParamType::Pos)))
    });
    assert!(events
        .iter()
        .any(|events| events.applied().contains(&(2, ParamType::Pos))));
    assert_eq!(
        client_b.scene().unwrap().node(2).unwrap().common().position,
        [1.0, 2.0, 3.0]
    );

    let events = tick_until(&mut client_a, |_, events| {
        events.iter().any(|events| events.echoes() > 0)
    });
    assert!(events.iter().all(|events| events.applied().is_empty()));

    client_a.shutdown();
    client_b.shutdown();
    server.shutdown();
    assert!(!server.sync_server().is_running());
}

#[test]
fn subscriber_that_stops_reading_is_dropped() {
    let _ = env_logger::builder().is_test(true).try_init();
    const FRAMES: usize = 64;
    const FRAME_SIZE: usize = 1 << 20;
    let mut server = server_with(ServerConfig {
        subscriber_capacity: 2 * FRAMES,
        write_timeout: Duration::from_millis(200),
        ..local_config()
    });
    let subscribe_addr = server.subscribe_addr().expect("subscribe port bound");

    // connected but never read from
    let _stalled = TcpStream::connect(subscribe_addr).expect("stalled subscriber connects");
    let healthy = TcpStream::connect(subscribe_addr).expect("healthy subscriber connects");
    assert!(wait_until(|| server.sync_server().subscriber_count() == 2));

    let reader = thread::spawn(move || {
        let mut receiver = TcpFrameReceiver::new(healthy);
        let mut large = 0;
        while large < FRAMES {
            match receiver.receive(WAIT_TIMEOUT) {
                Ok(Some(frame)) if frame.len() == FRAME_SIZE => large += 1,
                Ok(Some(_)) => {}
                Ok(None) | Err(_) => break,
            }
        }
        large
    });

    let mut publisher = TcpStream::connect(server.publish_addr().expect("publish port bound"))
        .expect("publisher connects");
    // undecodable payloads are relayed uncached
    let mut payload = vec![0u8; FRAME_SIZE];
    payload[0] = 200;
    payload[1] = 0xFF;
    for _ in 0..FRAMES {
        write_frame(&mut publisher, &payload).expect("publish should not stall");
    }

    assert_eq!(reader.join().expect("reader thread"), FRAMES);
    let ping = ParameterUpdate::new(200, 0, ParameterValue::Ping).encode();
    assert!(wait_until(|| {
        // a frame per poll lets the relay notice the writer has gone
        let _ = write_frame(&mut publisher, &ping);
        server.sync_server().subscriber_count() == 1
    }));

    server.shutdown();
}
