use std::sync::{Arc, Mutex};

use cohort_client::{ClientConfig, ObjectEvent, SubscribeEvent, SubscribeFailEvent};
use cohort_server::{
    CohortServerError, EventSender, ObjectListener, ObjectResolver, Resolution, ResolvedObject,
    Server, ServerConfig, SubscribeError, SubscribeOutcome, Subscriber, Unsubscribed,
};
use cohort_shared::{Event, EventKind, FailureReason, Oid, Snapshot, Value};
use cohort_test::{exchange_packets, place_schema, TestClient};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn server_with_place(state: i32) -> (Server, Oid) {
    let mut server = Server::new(ServerConfig::default()).unwrap();
    let place = server
        .create_object(
            place_schema().unwrap(),
            vec![("state".to_string(), Value::Int(state))],
        )
        .unwrap();
    (server, place)
}

#[test]
fn late_subscriber_receives_current_state() {
    init();
    let (mut server, place) = server_with_place(0);

    let mut a = TestClient::connect(&mut server, ClientConfig::default()).unwrap();
    a.client.subscribe(place).unwrap();
    exchange_packets(&mut server, &mut [&mut a]);
    assert_eq!(
        a.client.object(place).unwrap().get("state"),
        Some(&Value::Int(0))
    );
    let mut events = a.events();
    assert!(events.read::<SubscribeEvent>().any(|oid| oid == place));

    server
        .post_event(Event::attribute_changed(place, "state", 1))
        .unwrap();
    exchange_packets(&mut server, &mut [&mut a]);

    let changes: Vec<Event> = a.events().read::<ObjectEvent>().collect();
    assert_eq!(changes.len(), 1);
    assert_eq!(
        changes[0].kind(),
        &EventKind::AttributeChanged {
            name: "state".to_string(),
            value: Value::Int(1),
            old_value: Some(Value::Int(0)),
        }
    );

    let mut b = TestClient::connect(&mut server, ClientConfig::default()).unwrap();
    b.client.subscribe(place).unwrap();
    exchange_packets(&mut server, &mut [&mut a, &mut b]);
    assert_eq!(
        b.client.object(place).unwrap().get("state"),
        Some(&Value::Int(1))
    );
    assert!(!a.events().has::<ObjectEvent>());
}

#[test]
fn snapshot_and_stream_reproduce_authority_state() {
    init();
    let (mut server, place) = server_with_place(0);
    let mut client = TestClient::connect(&mut server, ClientConfig::default()).unwrap();

    for state in 1..=5 {
        server
            .post_event(Event::attribute_changed(place, "state", state))
            .unwrap();
    }
    server
        .post_event(Event::element_added(place, "occupants", Oid::from_u32(40)))
        .unwrap();
    // Subscribe while those events are still queued
    client.client.subscribe(place).unwrap();
    client.send_all(&mut server);
    for state in 6..=9 {
        server
            .post_event(Event::attribute_changed(place, "state", state))
            .unwrap();
    }
    server
        .post_event(Event::attribute_changed(place, "name", "lobby"))
        .unwrap();
    server
        .post_event(Event::message(place, "chime", vec![Value::Int(3)]))
        .unwrap();
    exchange_packets(&mut server, &mut [&mut client]);

    let authority = server.object(place).unwrap();
    let proxy = client.client.object(place).unwrap();
    assert_eq!(
        proxy.attributes().collect::<Vec<_>>(),
        authority.attributes().collect::<Vec<_>>()
    );
    assert_eq!(proxy.sequence(), authority.sequence());
    assert_eq!(proxy.get("state"), Some(&Value::Int(9)));
}

#[test]
fn unsubscribe_is_idempotent() {
    init();
    let (mut server, place) = server_with_place(0);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    let listener = server.add_listener(move |event: &Event, _: &EventSender| {
        log.lock().unwrap().push(event.clone())
    });
    let subscriber = Subscriber::Local(listener);
    assert!(matches!(
        server.subscribe(subscriber, place),
        Ok(SubscribeOutcome::Subscribed(_))
    ));
    assert_eq!(
        server.unsubscribe(subscriber, place),
        Unsubscribed::Removed { remaining: 0 }
    );
    assert_eq!(
        server.unsubscribe(subscriber, place),
        Unsubscribed::NotSubscribed
    );

    let mut client = TestClient::connect(&mut server, ClientConfig::default()).unwrap();
    client.client.subscribe(place).unwrap();
    exchange_packets(&mut server, &mut [&mut client]);
    client.client.unsubscribe(place).unwrap();
    client.client.unsubscribe(place).unwrap();
    let record = exchange_packets(&mut server, &mut [&mut client]);
    assert!(record.errors.is_empty());
    assert!(server.subscribers(place).is_empty());
    assert!(client.client.object(place).is_none());

    server
        .post_event(Event::attribute_changed(place, "state", 2))
        .unwrap();
    exchange_packets(&mut server, &mut [&mut client]);
    assert!(!client.events().has::<ObjectEvent>());
    assert!(seen.lock().unwrap().is_empty());
    // Non-ephemeral objects outlive their subscribers
    assert!(server.object(place).is_some());
}

#[test]
fn subscribing_to_unknown_object_fails() {
    init();
    let (mut server, _) = server_with_place(0);
    let mut client = TestClient::connect(&mut server, ClientConfig::default()).unwrap();
    let missing = Oid::from_u32(999);

    client.client.subscribe(missing).unwrap();
    let record = exchange_packets(&mut server, &mut [&mut client]);

    assert_eq!(
        record.errors,
        vec![CohortServerError::Subscribe(SubscribeError::UnknownTarget {
            oid: missing
        })]
    );
    let failures: Vec<_> = client.events().read::<SubscribeFailEvent>().collect();
    assert_eq!(failures, vec![(missing, FailureReason::UnknownTarget)]);
    assert!(client.client.object(missing).is_none());
}

#[test]
fn destroyed_object_drops_proxies() {
    init();
    let (mut server, place) = server_with_place(4);
    let mut client = TestClient::connect(&mut server, ClientConfig::default()).unwrap();
    client.client.subscribe(place).unwrap();
    exchange_packets(&mut server, &mut [&mut client]);
    client.events();

    server.destroy_object(place).unwrap();
    exchange_packets(&mut server, &mut [&mut client]);

    let events: Vec<Event> = client.events().read::<ObjectEvent>().collect();
    assert_eq!(events, vec![Event::object_removed(place)]);
    assert!(client.client.object(place).is_none());
    assert!(server.object(place).is_none());
}

#[test]
fn client_posts_are_applied_then_forwarded() {
    init();
    let (mut server, place) = server_with_place(0);
    let mut a = TestClient::connect(&mut server, ClientConfig::default()).unwrap();
    let mut b = TestClient::connect(&mut server, ClientConfig::default()).unwrap();
    a.client.subscribe(place).unwrap();
    b.client.subscribe(place).unwrap();
    exchange_packets(&mut server, &mut [&mut a, &mut b]);

    a.client
        .post_event(Event::attribute_changed(place, "state", 8))
        .unwrap();
    // Proxies only move once the server has applied the event
    assert_eq!(
        a.client.object(place).unwrap().get("state"),
        Some(&Value::Int(0))
    );
    exchange_packets(&mut server, &mut [&mut a, &mut b]);

    let a_oid = a.client.client_oid().unwrap();
    for client in [&mut a, &mut b] {
        assert_eq!(
            client.client.object(place).unwrap().get("state"),
            Some(&Value::Int(8))
        );
        let events: Vec<Event> = client.events().read::<ObjectEvent>().collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].source(), Some(a_oid));
    }
}

#[derive(Clone, Default)]
struct DeferredResolver {
    requested: Arc<Mutex<Vec<Oid>>>,
}

impl ObjectResolver for DeferredResolver {
    fn begin_resolve(&mut self, oid: Oid) -> Resolution {
        self.requested.lock().unwrap().push(oid);
        Resolution::Pending
    }
}

#[test]
fn pending_resolution_answers_every_waiting_subscriber() {
    init();
    let mut server = Server::new(ServerConfig::default()).unwrap();
    let resolver = DeferredResolver::default();
    server.set_resolver(resolver.clone());

    let mut a = TestClient::connect(&mut server, ClientConfig::default()).unwrap();
    let mut b = TestClient::connect(&mut server, ClientConfig::default()).unwrap();
    let remote = Oid::from_u32(500);
    a.client.subscribe(remote).unwrap();
    b.client.subscribe(remote).unwrap();
    exchange_packets(&mut server, &mut [&mut a, &mut b]);

    // Only the first subscriber starts a resolution
    assert_eq!(*resolver.requested.lock().unwrap(), vec![remote]);
    assert!(a.client.object(remote).is_none());

    server.complete_resolution(
        remote,
        Some(ResolvedObject {
            schema: place_schema().unwrap(),
            attributes: vec![("state".to_string(), Value::Int(12))],
        }),
    );
    exchange_packets(&mut server, &mut [&mut a, &mut b]);

    for client in [&mut a, &mut b] {
        assert_eq!(
            client.client.object(remote).unwrap().get("state"),
            Some(&Value::Int(12))
        );
        assert!(client.events().read::<SubscribeEvent>().any(|oid| oid == remote));
    }

    // Resolved objects are ephemeral
    a.client.unsubscribe(remote).unwrap();
    b.client.unsubscribe(remote).unwrap();
    let record = exchange_packets(&mut server, &mut [&mut a, &mut b]);
    assert_eq!(record.evictions, vec![remote]);
    assert!(server.object(remote).is_none());
}

#[test]
fn failed_resolution_fails_every_waiting_subscriber() {
    init();
    let mut server = Server::new(ServerConfig::default()).unwrap();
    server.set_resolver(DeferredResolver::default());
    let mut client = TestClient::connect(&mut server, ClientConfig::default()).unwrap();
    let remote = Oid::from_u32(501);

    client.client.subscribe(remote).unwrap();
    exchange_packets(&mut server, &mut [&mut client]);
    server.complete_resolution(remote, None);
    exchange_packets(&mut server, &mut [&mut client]);

    let failures: Vec<_> = client.events().read::<SubscribeFailEvent>().collect();
    assert_eq!(failures, vec![(remote, FailureReason::UnknownTarget)]);
}

struct FaultyListener;

impl ObjectListener for FaultyListener {
    fn handle_event(&mut self, _: &Event, _: &EventSender) {}

    fn object_available(&mut self, snapshot: &Snapshot, _: &EventSender) {
        panic!("cannot use {}", snapshot.oid);
    }

    fn request_failed(&mut self, oid: Oid, _: &FailureReason) {
        panic!("cannot handle failure of {}", oid);
    }
}

#[test]
fn panicking_listener_does_not_stop_resolution() {
    init();
    let mut server = Server::new(ServerConfig::default()).unwrap();
    server.set_resolver(DeferredResolver::default());
    let faulty = Subscriber::Local(server.add_listener(FaultyListener));
    let mut client = TestClient::connect(&mut server, ClientConfig::default()).unwrap();
    let found = Oid::from_u32(600);
    let lost = Oid::from_u32(601);

    assert_eq!(server.subscribe(faulty, found), Ok(SubscribeOutcome::Pending));
    assert_eq!(server.subscribe(faulty, lost), Ok(SubscribeOutcome::Pending));
    client.client.subscribe(found).unwrap();
    exchange_packets(&mut server, &mut [&mut client]);

    server.complete_resolution(
        found,
        Some(ResolvedObject {
            schema: place_schema().unwrap(),
            attributes: vec![("state".to_string(), Value::Int(3))],
        }),
    );
    server.complete_resolution(lost, None);
    exchange_packets(&mut server, &mut [&mut client]);

    // The client waiting behind the faulty listener is still answered
    assert_eq!(
        client.client.object(found).unwrap().get("state"),
        Some(&Value::Int(3))
    );
    server
        .post_event(Event::attribute_changed(found, "state", 4))
        .unwrap();
    exchange_packets(&mut server, &mut [&mut client]);
    assert_eq!(
        client.client.object(found).unwrap().get("state"),
        Some(&Value::Int(4))
    );
}

#[test]
fn unregistered_subscribers_are_refused() {
    init();
    let mut server = Server::new(ServerConfig::default()).unwrap();
    let room = server
        .create_ephemeral_object(place_schema().unwrap(), Vec::new())
        .unwrap();

    let listener = server.add_listener(|_: &Event, _: &EventSender| {});
    server.remove_listener(listener);
    let stale = Subscriber::Local(listener);
    assert_eq!(
        server.subscribe(stale, room),
        Err(SubscribeError::UnknownSubscriber { subscriber: stale })
    );

    let client = TestClient::connect(&mut server, ClientConfig::default()).unwrap();
    server.disconnect(client.connection);
    let gone = Subscriber::Remote(client.connection);
    assert_eq!(
        server.subscribe(gone, room),
        Err(SubscribeError::UnknownSubscriber { subscriber: gone })
    );
    assert!(server.subscribers(room).is_empty());
}
