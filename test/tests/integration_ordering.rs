use std::{
    sync::{Arc, Mutex},
    thread,
};

use cohort_client::{ClientConfig, ObjectEvent};
use cohort_server::{EventSender, Server, ServerConfig, Subscriber};
use cohort_shared::{Event, FromValue, Value};
use cohort_test::{exchange_packets, place_schema, TestClient};

const PRODUCERS: i32 = 4;
const EVENTS_PER_PRODUCER: i32 = 50;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn tick(event: &Event) -> Option<(i32, i32)> {
    let (name, args) = event.as_message()?;
    if name != "tick" {
        return None;
    }
    let producer = i32::from_value(args.first()?.clone())?;
    let sequence = i32::from_value(args.get(1)?.clone())?;
    Some((producer, sequence))
}

#[test]
fn per_object_order_survives_concurrent_producers() {
    init();
    let mut server = Server::new(ServerConfig::default()).unwrap();
    let place = server
        .create_object(place_schema().unwrap(), Vec::new())
        .unwrap();

    let observed = Arc::new(Mutex::new(Vec::new()));
    let log = observed.clone();
    let listener = server.add_listener(move |event: &Event, _: &EventSender| {
        if let Some(tick) = tick(event) {
            log.lock().unwrap().push(tick);
        }
    });
    server.subscribe(Subscriber::Local(listener), place).unwrap();
    let mut client = TestClient::connect(&mut server, ClientConfig::default()).unwrap();
    client.client.subscribe(place).unwrap();
    exchange_packets(&mut server, &mut [&mut client]);

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|producer| {
            let sender = server.event_sender();
            thread::spawn(move || {
                for sequence in 0..EVENTS_PER_PRODUCER {
                    sender
                        .post(Event::message(
                            place,
                            "tick",
                            vec![Value::Int(producer), Value::Int(sequence)],
                        ))
                        .unwrap();
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }
    exchange_packets(&mut server, &mut [&mut client]);

    let server_order = observed.lock().unwrap().clone();
    assert_eq!(server_order.len(), (PRODUCERS * EVENTS_PER_PRODUCER) as usize);
    for producer in 0..PRODUCERS {
        let sequences: Vec<i32> = server_order
            .iter()
            .filter(|(from, _)| *from == producer)
            .map(|(_, sequence)| *sequence)
            .collect();
        assert_eq!(sequences, (0..EVENTS_PER_PRODUCER).collect::<Vec<_>>());
    }

    let client_order: Vec<(i32, i32)> = client
        .events()
        .read::<ObjectEvent>()
        .filter_map(|event| tick(&event))
        .collect();
    assert_eq!(client_order, server_order);
}

#[test]
fn events_posted_while_handling_follow_the_current_event() {
    init();
    let mut server = Server::new(ServerConfig::default()).unwrap();
    let place = server
        .create_object(place_schema().unwrap(), Vec::new())
        .unwrap();

    // Echoes each state change as a message, from inside the loop
    let echo = server.add_listener(move |event: &Event, sender: &EventSender| {
        if let Some("state") = event.attribute_name() {
            sender
                .post(Event::message(event.target(), "echo", Vec::new()))
                .unwrap();
        }
    });
    server.subscribe(Subscriber::Local(echo), place).unwrap();
    let mut client = TestClient::connect(&mut server, ClientConfig::default()).unwrap();
    client.client.subscribe(place).unwrap();
    exchange_packets(&mut server, &mut [&mut client]);
    client.events();

    server
        .post_event(Event::attribute_changed(place, "state", 1))
        .unwrap();
    server
        .post_event(Event::attribute_changed(place, "state", 2))
        .unwrap();
    exchange_packets(&mut server, &mut [&mut client]);

    let names: Vec<String> = client
        .events()
        .read::<ObjectEvent>()
        .map(|event| match event.as_message() {
            Some((name, _)) => name.to_string(),
            None => event.attribute_name().unwrap_or_default().to_string(),
        })
        .collect();
    assert_eq!(names, vec!["state", "state", "echo", "echo"]);
}
