use std::time::{Duration, Instant};

use cohort_client::{ClientConfig, SubscribeFailEvent};
use cohort_server::{
    EventSender, EvictionEvent, EvictionPolicy, Server, ServerConfig, Subscriber,
};
use cohort_shared::{Event, FailureReason};
use cohort_test::{exchange_packets, place_schema, TestClient};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn ephemeral_object_is_evicted_once_interest_is_gone() {
    init();
    let mut server = Server::new(ServerConfig::default()).unwrap();
    let room = server
        .create_ephemeral_object(place_schema().unwrap(), Vec::new())
        .unwrap();
    let mut host = TestClient::connect(&mut server, ClientConfig::default()).unwrap();
    let mut guest = TestClient::connect(&mut server, ClientConfig::default()).unwrap();

    host.client.subscribe(room).unwrap();
    exchange_packets(&mut server, &mut [&mut host, &mut guest]);
    for _ in 0..5 {
        guest.client.subscribe(room).unwrap();
        exchange_packets(&mut server, &mut [&mut host, &mut guest]);
        assert_eq!(server.subscribers(room).len(), 2);

        guest.client.unsubscribe(room).unwrap();
        let record = exchange_packets(&mut server, &mut [&mut host, &mut guest]);
        assert!(record.evictions.is_empty());
        assert!(server.object(room).is_some());
    }

    host.client.unsubscribe(room).unwrap();
    let record = exchange_packets(&mut server, &mut [&mut host, &mut guest]);
    assert_eq!(record.evictions, vec![room]);
    assert!(server.object(room).is_none());

    // The identifier is retired
    guest.client.subscribe(room).unwrap();
    exchange_packets(&mut server, &mut [&mut host, &mut guest]);
    let failures: Vec<_> = guest.events().read::<SubscribeFailEvent>().collect();
    assert_eq!(failures, vec![(room, FailureReason::UnknownTarget)]);
}

#[test]
fn disconnect_releases_interest() {
    init();
    let mut server = Server::new(ServerConfig::default()).unwrap();
    let room = server
        .create_ephemeral_object(place_schema().unwrap(), Vec::new())
        .unwrap();
    let mut client = TestClient::connect(&mut server, ClientConfig::default()).unwrap();
    client.client.subscribe(room).unwrap();
    exchange_packets(&mut server, &mut [&mut client]);
    let client_oid = client.client.client_oid().unwrap();

    client.drop_link(&mut server);
    let mut events = server.process();

    assert_eq!(events.read::<EvictionEvent>().collect::<Vec<_>>(), vec![room]);
    assert!(server.object(room).is_none());
    assert!(server.object(client_oid).is_none());
    assert_eq!(server.connection_count(), 0);
}

#[test]
fn debounced_eviction_waits_out_the_delay() {
    init();
    let delay = Duration::from_secs(5);
    let mut server = Server::new(ServerConfig {
        eviction: EvictionPolicy::Debounced(delay),
        ..ServerConfig::default()
    })
    .unwrap();
    let room = server
        .create_ephemeral_object(place_schema().unwrap(), Vec::new())
        .unwrap();
    let watcher = Subscriber::Local(server.add_listener(|_: &Event, _: &EventSender| {}));
    let start = Instant::now();

    server.subscribe(watcher, room).unwrap();
    server.unsubscribe(watcher, room);
    assert!(!server.process_at(start).has::<EvictionEvent>());
    assert!(!server
        .process_at(start + Duration::from_secs(4))
        .has::<EvictionEvent>());

    // Coming back cancels the pending eviction
    server.subscribe(watcher, room).unwrap();
    assert!(!server
        .process_at(start + Duration::from_secs(6))
        .has::<EvictionEvent>());
    server.unsubscribe(watcher, room);
    assert!(!server
        .process_at(start + Duration::from_secs(7))
        .has::<EvictionEvent>());
    assert!(server.object(room).is_some());

    let mut events = server.process_at(start + Duration::from_secs(12));
    assert_eq!(events.read::<EvictionEvent>().collect::<Vec<_>>(), vec![room]);
    assert!(server.object(room).is_none());
}

#[test]
fn persistent_objects_are_never_evicted() {
    init();
    let mut server = Server::new(ServerConfig::default()).unwrap();
    let lobby = server
        .create_object(place_schema().unwrap(), Vec::new())
        .unwrap();
    let watcher = Subscriber::Local(server.add_listener(|_: &Event, _: &EventSender| {}));

    for _ in 0..3 {
        server.subscribe(watcher, lobby).unwrap();
        server.unsubscribe(watcher, lobby);
    }
    assert!(!server.process().has::<EvictionEvent>());
    assert!(server.object(lobby).is_some());
}
