use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::{Duration, Instant},
};

use cohort_client::{
    named_response, ClientConfig, CohortClientError, DisconnectEvent, ErrorEvent, ObjectEvent,
};
use cohort_server::{Server, ServerConfig};
use cohort_shared::{
    Event, InvocationError, InvocationId, InvocationResponse, Marshaller, Value,
};
use cohort_test::{
    exchange_packets, game_marshaller, game_server, place_schema, ChatReceiver,
    ScriptedGame, TestClient,
};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn setup(game: ScriptedGame) -> (Server, TestClient) {
    let mut server = game_server(ServerConfig::default(), game).unwrap();
    let client = TestClient::connect(&mut server, ClientConfig::default()).unwrap();
    (server, client)
}

#[test]
fn response_is_delivered_once_and_duplicates_are_discarded() {
    init();
    let game = ScriptedGame::default();
    let (mut server, mut client) = setup(game.clone());
    let marshaller = game_marshaller().unwrap();

    for _ in 0..7 {
        client.client.call(&marshaller, "ready", Vec::new()).unwrap();
    }
    exchange_packets(&mut server, &mut [&mut client]);
    assert_eq!(client.client.pending_count(), 0);

    let delivered = Arc::new(AtomicUsize::new(0));
    let outcome = Arc::new(Mutex::new(None));
    let (counter, slot) = (delivered.clone(), outcome.clone());
    let id = client
        .client
        .invoke(
            &marshaller,
            "ready",
            Vec::new(),
            move |result: Result<Vec<Value>, InvocationError>| {
                counter.fetch_add(1, Ordering::SeqCst);
                *slot.lock().unwrap() = Some(result);
            },
        )
        .unwrap();
    assert_eq!(id, InvocationId::from_u32(7));
    assert!(client.client.is_pending(id));

    exchange_packets(&mut server, &mut [&mut client]);
    assert!(!client.client.is_pending(id));
    assert_eq!(delivered.load(Ordering::SeqCst), 1);
    assert_eq!(*outcome.lock().unwrap(), Some(Ok(Vec::new())));
    assert_eq!(game.calls().len(), 8);
    client.events();

    let client_oid = client.client.client_oid().unwrap();
    server
        .post_event(InvocationResponse::processed(id, Vec::new()).to_event(client_oid))
        .unwrap();
    exchange_packets(&mut server, &mut [&mut client]);

    assert_eq!(delivered.load(Ordering::SeqCst), 1);
    let errors: Vec<_> = client.events().read::<ErrorEvent>().collect();
    assert_eq!(errors, vec![CohortClientError::UnknownInvocation { id }]);
}

#[test]
fn connection_loss_fails_every_pending_call() {
    init();
    let game = ScriptedGame::default();
    let (mut server, mut client) = setup(game.clone());
    let marshaller = game_marshaller().unwrap();

    for _ in 0..3 {
        client.client.call(&marshaller, "ready", Vec::new()).unwrap();
    }
    exchange_packets(&mut server, &mut [&mut client]);

    // Deferred by the provider, so both stay pending
    let mut third = client
        .client
        .call(&marshaller, "getConfigInfo", Vec::new())
        .unwrap();
    let mut fourth = client
        .client
        .call(&marshaller, "getConfigInfo", Vec::new())
        .unwrap();
    exchange_packets(&mut server, &mut [&mut client]);
    assert!(client.client.is_pending(InvocationId::from_u32(3)));
    assert!(client.client.is_pending(InvocationId::from_u32(4)));
    assert_eq!(third.try_result(), None);

    client.drop_link(&mut server);

    assert_eq!(third.try_result(), Some(Err(InvocationError::ConnectionLost)));
    assert_eq!(fourth.try_result(), Some(Err(InvocationError::ConnectionLost)));
    assert_eq!(client.client.pending_count(), 0);
    assert!(!client.client.is_ready());
    assert!(client.events().has::<DisconnectEvent>());
    assert!(!server.is_connected(client.connection));
    assert_eq!(game.take_deferred().len(), 2);

    assert_eq!(
        client.client.call(&marshaller, "ready", Vec::new()).err(),
        Some(CohortClientError::NotConnected)
    );
}

#[test]
fn unregistered_procedure_is_unresolved_and_processing_continues() {
    init();
    let (mut server, mut client) = setup(ScriptedGame::default());
    let place = server
        .create_object(place_schema().unwrap(), Vec::new())
        .unwrap();
    client.client.subscribe(place).unwrap();
    exchange_packets(&mut server, &mut [&mut client]);
    client.events();

    let newer = Marshaller::new("Game", &["ready", "teleport"]).unwrap();
    let lobby = Marshaller::new("Lobby", &["join"]).unwrap();
    let mut teleport = client.client.call(&newer, "teleport", Vec::new()).unwrap();
    let mut join = client.client.call(&lobby, "join", Vec::new()).unwrap();
    server
        .post_event(Event::attribute_changed(place, "state", 3))
        .unwrap();
    let mut ready = client.client.call(&newer, "ready", Vec::new()).unwrap();
    exchange_packets(&mut server, &mut [&mut client]);

    assert!(matches!(
        teleport.try_result(),
        Some(Err(InvocationError::UnresolvedTarget(_)))
    ));
    assert!(matches!(
        join.try_result(),
        Some(Err(InvocationError::UnresolvedTarget(_)))
    ));
    assert_eq!(ready.try_result(), Some(Ok(Vec::new())));

    let events: Vec<Event> = client.events().read::<ObjectEvent>().collect();
    assert_eq!(events.len(), 1);
    assert_eq!(
        client.client.object(place).unwrap().get("state"),
        Some(&Value::Int(3))
    );
}

#[test]
fn provider_panic_fails_only_that_call() {
    init();
    let game = ScriptedGame {
        panic_on_start: true,
        ..ScriptedGame::default()
    };
    let (mut server, mut client) = setup(game);
    let marshaller = game_marshaller().unwrap();

    let mut start = client
        .client
        .call(&marshaller, "startGame", Vec::new())
        .unwrap();
    let mut ready = client.client.call(&marshaller, "ready", Vec::new()).unwrap();
    exchange_packets(&mut server, &mut [&mut client]);

    match start.try_result() {
        Some(Err(InvocationError::ApplicationFailure(detail))) => {
            assert_eq!(detail, "Game#startGame panicked: boom");
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    assert_eq!(ready.try_result(), Some(Ok(Vec::new())));
}

#[test]
fn malformed_arguments_fail_only_that_call() {
    init();
    let (mut server, mut client) = setup(ScriptedGame::default());
    let marshaller = game_marshaller().unwrap();

    let mut bad = client
        .client
        .call(
            &marshaller,
            "moveTo",
            vec![Value::from("north"), Value::Int(2)],
        )
        .unwrap();
    let mut short = client
        .client
        .call(&marshaller, "moveTo", vec![Value::Int(2)])
        .unwrap();
    let mut good = client
        .client
        .call(&marshaller, "moveTo", vec![Value::Int(3), Value::Int(-4)])
        .unwrap();
    exchange_packets(&mut server, &mut [&mut client]);

    assert_eq!(
        bad.try_result(),
        Some(Err(InvocationError::Decode(
            "argument 0 should be Int but is String".to_string()
        )))
    );
    assert_eq!(
        short.try_result(),
        Some(Err(InvocationError::Decode(
            "argument 1 is missing, expected Int".to_string()
        )))
    );
    assert_eq!(good.try_result(), Some(Ok(vec![Value::Int(7)])));
}

#[test]
fn deferred_response_reaches_the_caller() {
    init();
    let game = ScriptedGame::default();
    let (mut server, mut client) = setup(game.clone());
    let marshaller = game_marshaller().unwrap();

    let mut config = client
        .client
        .call(&marshaller, "getConfigInfo", Vec::new())
        .unwrap();
    exchange_packets(&mut server, &mut [&mut client]);
    assert_eq!(config.try_result(), None);

    let deferred = game.take_deferred();
    assert_eq!(deferred.len(), 1);
    assert_eq!(deferred[0].id(), InvocationId::from_u32(0));
    server
        .respond(&deferred[0], Ok(vec![Value::from("max_players=8")]))
        .unwrap();
    exchange_packets(&mut server, &mut [&mut client]);

    assert_eq!(
        config.try_result(),
        Some(Ok(vec![Value::String("max_players=8".to_string())]))
    );
}

#[test]
fn named_response_reaches_the_caller_with_its_name() {
    init();
    let game = ScriptedGame::default();
    let (mut server, mut client) = setup(game.clone());
    let marshaller = game_marshaller().unwrap();

    let outcome = Arc::new(Mutex::new(None));
    let slot = outcome.clone();
    let named = client
        .client
        .invoke(
            &marshaller,
            "getConfigInfo",
            Vec::new(),
            named_response(move |result| {
                *slot.lock().unwrap() = Some(result);
            }),
        )
        .unwrap();
    let mut plain = client
        .client
        .call(&marshaller, "getConfigInfo", Vec::new())
        .unwrap();
    exchange_packets(&mut server, &mut [&mut client]);

    let deferred = game.take_deferred();
    assert_eq!(deferred.len(), 2);
    assert_eq!(deferred[0].id(), named);
    deferred[0]
        .respond_named("configPending", vec![Value::from("retry")])
        .unwrap();
    deferred[1]
        .respond_named("configPending", vec![Value::from("retry")])
        .unwrap();
    exchange_packets(&mut server, &mut [&mut client]);

    assert_eq!(
        outcome.lock().unwrap().take(),
        Some(Ok((
            "configPending".to_string(),
            vec![Value::from("retry")]
        )))
    );
    // Targets without a named hook still get the result args
    assert_eq!(plain.try_result(), Some(Ok(vec![Value::from("retry")])));
    assert_eq!(client.client.pending_count(), 0);
}

#[test]
fn notifications_are_routed_by_module() {
    init();
    let (mut server, mut client) = setup(ScriptedGame::default());
    let chat = ChatReceiver::default();
    client.client.register_receiver("Chat", chat.clone()).unwrap();
    assert!(client
        .client
        .register_receiver("Chat", ChatReceiver::default())
        .is_err());
    let marshaller = game_marshaller().unwrap();

    let mut start = client
        .client
        .call(&marshaller, "startGame", Vec::new())
        .unwrap();
    exchange_packets(&mut server, &mut [&mut client]);
    assert_eq!(start.try_result(), Some(Ok(Vec::new())));

    let client_oid = client.client.client_oid().unwrap();
    server
        .notify(client.connection, "Chat", "speak", vec![Value::from("welcome")])
        .unwrap();
    exchange_packets(&mut server, &mut [&mut client]);

    assert_eq!(
        chat.heard(),
        vec![format!("{} started the game", client_oid), "welcome".to_string()]
    );
    // Invocation traffic is not reported as object events
    assert!(!client.events().has::<ObjectEvent>());
}

#[test]
fn notification_without_receiver_is_reported() {
    init();
    let (mut server, mut client) = setup(ScriptedGame::default());

    server
        .notify(client.connection, "Chat", "speak", vec![Value::from("anyone?")])
        .unwrap();
    exchange_packets(&mut server, &mut [&mut client]);

    let errors: Vec<_> = client.events().read::<ErrorEvent>().collect();
    assert_eq!(
        errors,
        vec![CohortClientError::UnroutedNotification {
            module: "Chat".to_string()
        }]
    );
}

#[test]
fn timed_out_call_ignores_its_late_response() {
    init();
    let game = ScriptedGame::default();
    let (mut server, mut client) = setup(game.clone());
    let marshaller = game_marshaller().unwrap();

    let outcome = Arc::new(Mutex::new(Vec::new()));
    let slot = outcome.clone();
    let id = client
        .client
        .invoke_with_timeout(
            &marshaller,
            "getConfigInfo",
            Vec::new(),
            move |result: Result<Vec<Value>, InvocationError>| slot.lock().unwrap().push(result),
            Duration::from_secs(1),
        )
        .unwrap();
    exchange_packets(&mut server, &mut [&mut client]);

    client.client.process_at(Instant::now() + Duration::from_secs(2));
    assert_eq!(*outcome.lock().unwrap(), vec![Err(InvocationError::Timeout)]);
    assert!(!client.client.is_pending(id));

    for responder in game.take_deferred() {
        server.respond(&responder, Ok(Vec::new())).unwrap();
    }
    exchange_packets(&mut server, &mut [&mut client]);

    assert_eq!(outcome.lock().unwrap().len(), 1);
    let errors: Vec<_> = client.events().read::<ErrorEvent>().collect();
    assert_eq!(errors, vec![CohortClientError::UnknownInvocation { id }]);
}

#[test]
fn fire_and_forget_call_gets_no_response() {
    init();
    let game = ScriptedGame::default();
    let (mut server, mut client) = setup(game.clone());
    let marshaller = game_marshaller().unwrap();

    client.client.send(&marshaller, "leave", Vec::new()).unwrap();
    exchange_packets(&mut server, &mut [&mut client]);

    let client_oid = client.client.client_oid().unwrap();
    assert_eq!(game.calls(), vec![format!("leave {}", client_oid)]);
    assert_eq!(client.client.pending_count(), 0);
    assert!(!client.events().has::<ErrorEvent>());
}
