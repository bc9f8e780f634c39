use std::{
    collections::HashMap,
    mem,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
    time::Instant,
};

use log::{info, warn};
use tokio::sync::mpsc::{self, UnboundedReceiver};

use cohort_shared::{
    Event, FailureReason, FieldKind, InvocationError, InvocationNotification, InvocationRequest,
    InvocationResponse, Marshaller, Oid, Packet, PacketSender, ProcedureCode, Schema,
    SharedObject, Snapshot, Value, NOTIFICATION_NAME, REQUEST_NAME, RESPONSE_NAME,
};

use crate::{
    event_sender::{Origin, Queued},
    events::ServerEvents,
    invocation::{Dispatcher, InvocationContext, InvocationManager, Responder},
    keys::KeyGenerator,
    server::connection::Connection,
    AccessController, AllowAll, CohortServerError, ConnectionKey, DirectoryError, EventSender,
    EvictionPolicy, ListenerKey, NoResolver, ObjectDirectory, ObjectListener, ObjectResolver,
    Resolution, ResolvedObject, ServerConfig, SubscribeError, SubscribeOutcome, Subscriber,
    SubscriptionRegistry, Unsubscribed,
};

/// The authority: owns every shared object, applies events to them one at a
/// time, fans committed events out to subscribers and dispatches invocation
/// requests. All state changes happen inside [`Server::process`] or the
/// `&mut self` methods; other threads go through an [`EventSender`].
pub struct Server {
    config: ServerConfig,
    // Objects
    directory: ObjectDirectory,
    registry: SubscriptionRegistry,
    access: Box<dyn AccessController>,
    resolver: Box<dyn ObjectResolver>,
    // Invocation
    invocation: InvocationManager,
    invocation_oid: Oid,
    client_schema: Arc<Schema>,
    // Parties
    keys: KeyGenerator,
    connections: HashMap<ConnectionKey, Connection>,
    client_connections: HashMap<Oid, ConnectionKey>,
    listeners: HashMap<ListenerKey, Box<dyn ObjectListener>>,
    // Queue
    sender: EventSender,
    receiver: UnboundedReceiver<Queued>,
    // Events
    incoming_events: ServerEvents,
    // Latest instant seen by `process_at`, stamps drops in interest
    clock: Instant,
}

impl Server {
    /// Create a new Server
    pub fn new(config: ServerConfig) -> Result<Self, CohortServerError> {
        let mut directory = ObjectDirectory::new();
        let invocation_schema = Arc::new(
            Schema::builder("InvocationObject")
                .build()
                .map_err(DirectoryError::from)?,
        );
        let (invocation_oid, _) = directory.create_object(invocation_schema, Vec::new(), false)?;
        let client_schema = Arc::new(
            Schema::builder("ClientObject")
                .field("username", FieldKind::String)
                .build()
                .map_err(DirectoryError::from)?,
        );
        let (sender, receiver) = mpsc::unbounded_channel();

        Ok(Self {
            registry: SubscriptionRegistry::new(config.eviction),
            config,
            directory,
            access: Box::new(AllowAll),
            resolver: Box::new(NoResolver),
            invocation: InvocationManager::new(),
            invocation_oid,
            client_schema,
            keys: KeyGenerator::default(),
            connections: HashMap::new(),
            client_connections: HashMap::new(),
            listeners: HashMap::new(),
            sender: EventSender::new(sender),
            receiver,
            incoming_events: ServerEvents::new(),
            clock: Instant::now(),
        })
    }

    pub fn set_access_controller<A: AccessController + 'static>(&mut self, access: A) {
        self.access = Box::new(access);
    }

    pub fn set_resolver<R: ObjectResolver + 'static>(&mut self, resolver: R) {
        self.resolver = Box::new(resolver);
    }

    pub fn register_dispatcher<D: Dispatcher + 'static>(
        &mut self,
        marshaller: Marshaller,
        dispatcher: D,
    ) -> Result<(), CohortServerError> {
        self.invocation.register(marshaller, Box::new(dispatcher))?;
        Ok(())
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The well-known object invocation requests are posted to
    pub fn invocation_oid(&self) -> Oid {
        self.invocation_oid
    }

    pub fn event_sender(&self) -> EventSender {
        self.sender.clone()
    }

    pub fn directory(&self) -> &ObjectDirectory {
        &self.directory
    }

    pub fn object(&self, oid: Oid) -> Option<&SharedObject> {
        self.directory.get(oid)
    }

    pub fn subscribers(&self, oid: Oid) -> &[Subscriber] {
        self.registry.subscribers(oid)
    }

    // Objects

    pub fn create_object(
        &mut self,
        schema: Arc<Schema>,
        attributes: Vec<(String, Value)>,
    ) -> Result<Oid, CohortServerError> {
        self.create(schema, attributes, false)
    }

    /// Creates an object that is destroyed once interest in it returns to
    /// zero, per the configured eviction policy
    pub fn create_ephemeral_object(
        &mut self,
        schema: Arc<Schema>,
        attributes: Vec<(String, Value)>,
    ) -> Result<Oid, CohortServerError> {
        self.create(schema, attributes, true)
    }

    /// Queues destruction behind every event already posted
    pub fn destroy_object(&mut self, oid: Oid) -> Result<(), CohortServerError> {
        self.sender.destroy(oid)
    }

    /// Queues an event from trusted server code
    pub fn post_event(&mut self, event: Event) -> Result<(), CohortServerError> {
        self.sender.post(event)
    }

    /// Queues an event on behalf of a subscriber, after consulting the access
    /// controller
    pub fn post_event_as(
        &mut self,
        subscriber: Subscriber,
        event: Event,
    ) -> Result<(), CohortServerError> {
        if !self.access.can_mutate(&subscriber, &event, &self.directory) {
            return Err(CohortServerError::AccessDenied {
                subscriber,
                oid: event.target(),
                event_type: format!("{:?}", event.event_type()),
            });
        }
        let origin = match subscriber {
            Subscriber::Local(_) => Origin::Server,
            Subscriber::Remote(connection) => Origin::Remote(connection),
        };
        self.sender.post_from(event, origin)
    }

    // Listeners

    pub fn add_listener<L: ObjectListener + 'static>(&mut self, listener: L) -> ListenerKey {
        let key = self.keys.listener();
        self.listeners.insert(key, Box::new(listener));
        key
    }

    /// Adds a listener that observes every object being added or removed
    pub fn add_global_listener<L: ObjectListener + 'static>(&mut self, listener: L) -> ListenerKey {
        let key = self.add_listener(listener);
        self.directory.add_global_listener(key);
        key
    }

    /// Drops a listener along with every subscription it held
    pub fn remove_listener(&mut self, key: ListenerKey) {
        if self.listeners.remove(&key).is_none() {
            return;
        }
        self.directory.remove_global_listener(key);
        for oid in self.registry.remove_subscriber(Subscriber::Local(key)) {
            if self.registry.subscriber_count(oid) == 0 {
                self.release_interest(oid);
            }
        }
    }

    // Subscriptions

    pub fn subscribe(
        &mut self,
        subscriber: Subscriber,
        oid: Oid,
    ) -> Result<SubscribeOutcome, SubscribeError> {
        let registered = match subscriber {
            Subscriber::Local(key) => self.listeners.contains_key(&key),
            Subscriber::Remote(connection) => self.connections.contains_key(&connection),
        };
        if !registered {
            warn!("Server Error: {} is not registered, cannot subscribe to {}", subscriber, oid);
            return Err(SubscribeError::UnknownSubscriber { subscriber });
        }
        if !self.access.can_subscribe(&subscriber, oid, &self.directory) {
            warn!("Server Error: {} denied subscription to {}", subscriber, oid);
            return Err(SubscribeError::AccessDenied { subscriber, oid });
        }

        if let Some(snapshot) = self.directory.snapshot(oid) {
            self.registry.add(oid, subscriber);
            return Ok(SubscribeOutcome::Subscribed(snapshot));
        }
        if oid.is_none() || self.directory.is_retired(oid) {
            return Err(SubscribeError::UnknownTarget { oid });
        }
        if self.registry.is_pending(oid) {
            self.registry.add_pending(oid, subscriber);
            return Ok(SubscribeOutcome::Pending);
        }

        match self.resolver.begin_resolve(oid) {
            Resolution::Ready(resolved) => {
                if !self.install_resolved(oid, resolved) {
                    return Err(SubscribeError::UnknownTarget { oid });
                }
                self.registry.add(oid, subscriber);
                self.directory
                    .snapshot(oid)
                    .map(SubscribeOutcome::Subscribed)
                    .ok_or(SubscribeError::UnknownTarget { oid })
            }
            Resolution::Pending => {
                self.registry.add_pending(oid, subscriber);
                Ok(SubscribeOutcome::Pending)
            }
            Resolution::Missing => Err(SubscribeError::UnknownTarget { oid }),
        }
    }

    pub fn unsubscribe(&mut self, subscriber: Subscriber, oid: Oid) -> Unsubscribed {
        let outcome = self.registry.remove(oid, subscriber);
        if outcome == (Unsubscribed::Removed { remaining: 0 }) {
            self.release_interest(oid);
        }
        outcome
    }

    /// Finishes a resolution the resolver reported as pending. Every waiting
    /// subscriber is told the outcome exactly once.
    pub fn complete_resolution(&mut self, oid: Oid, resolved: Option<ResolvedObject>) {
        let waiting = self.registry.take_pending(oid);
        let installed = match resolved {
            Some(resolved) => self.install_resolved(oid, resolved),
            None => false,
        };

        if !installed {
            warn!("Server Error: could not resolve {}", oid);
            for subscriber in waiting {
                self.notify_subscribe_failed(subscriber, oid, FailureReason::UnknownTarget);
            }
            return;
        }

        for subscriber in waiting {
            self.registry.add(oid, subscriber);
            if let Some(snapshot) = self.directory.snapshot(oid) {
                self.notify_subscribed(subscriber, snapshot);
            }
        }
        if self.registry.subscriber_count(oid) == 0 {
            self.release_interest(oid);
        }
    }

    // Connections

    /// Attaches a connection: creates its client object, subscribes the
    /// connection to it and sends the bootstrap packets
    pub fn connect(
        &mut self,
        sender: Box<dyn PacketSender>,
    ) -> Result<ConnectionKey, CohortServerError> {
        let connection = self.keys.connection();
        let (client_oid, added) =
            self.directory
                .create_object(self.client_schema.clone(), Vec::new(), false)?;
        self.connections
            .insert(connection, Connection { sender, client_oid });
        self.client_connections.insert(client_oid, connection);
        self.notify_global(&added);

        self.registry.add(client_oid, Subscriber::Remote(connection));
        self.send_packet(
            connection,
            &Packet::Bootstrap {
                client_oid,
                invocation_oid: self.invocation_oid,
            },
        );
        if let Some(snapshot) = self.directory.snapshot(client_oid) {
            self.send_packet(connection, &Packet::SubscribeAck(snapshot));
        }

        info!("{} attached with client object {}", connection, client_oid);
        Ok(connection)
    }

    /// Detaches a connection, dropping its subscriptions and destroying its
    /// client object
    pub fn disconnect(&mut self, connection: ConnectionKey) {
        let Some(removed) = self.connections.remove(&connection) else {
            warn!("Server Error: cannot disconnect unknown {}", connection);
            return;
        };
        self.client_connections.remove(&removed.client_oid);

        for oid in self.registry.remove_connection(connection) {
            if self.registry.subscriber_count(oid) == 0 {
                self.release_interest(oid);
            }
        }
        self.destroy_now(removed.client_oid);
        info!("{} detached", connection);
    }

    pub fn is_connected(&self, connection: ConnectionKey) -> bool {
        self.connections.contains_key(&connection)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn client_oid(&self, connection: ConnectionKey) -> Option<Oid> {
        self.connections
            .get(&connection)
            .map(|connection| connection.client_oid)
    }

    /// Handles one packet received from a connection
    pub fn receive_packet(&mut self, connection: ConnectionKey, payload: &[u8]) {
        let Some(client_oid) = self.client_oid(connection) else {
            warn!("Server Error: packet from unknown {}", connection);
            self.incoming_events
                .push_error(CohortServerError::UnknownConnection { connection });
            return;
        };
        let packet = match Packet::from_bytes(payload) {
            Ok(packet) => packet,
            Err(error) => {
                warn!("Server Error: malformed packet from {}: {}", connection, error);
                self.incoming_events
                    .push_error(CohortServerError::MalformedPacket { connection, error });
                return;
            }
        };

        let subscriber = Subscriber::Remote(connection);
        match packet {
            Packet::ForwardEvent(event) => {
                // The connection's identity is stamped here, never trusted
                // from the wire
                let event = event.with_source(client_oid);
                self.receive_remote_event(connection, event);
            }
            Packet::Subscribe { oid } => match self.subscribe(subscriber, oid) {
                Ok(SubscribeOutcome::Subscribed(snapshot)) => {
                    self.send_packet(connection, &Packet::SubscribeAck(snapshot));
                }
                Ok(SubscribeOutcome::Pending) => {}
                Err(error) => {
                    let reason = error.failure_reason();
                    self.incoming_events.push_error(error.into());
                    self.send_packet(connection, &Packet::SubscribeFail { oid, reason });
                }
            },
            Packet::Unsubscribe { oid } => {
                self.unsubscribe(subscriber, oid);
            }
            Packet::Bootstrap { .. } => self.unexpected_packet(connection, "Bootstrap"),
            Packet::SubscribeAck(_) => self.unexpected_packet(connection, "SubscribeAck"),
            Packet::SubscribeFail { .. } => self.unexpected_packet(connection, "SubscribeFail"),
            Packet::PostFailed { .. } => self.unexpected_packet(connection, "PostFailed"),
        }
    }

    // Invocation

    /// Answers a request whose provider deferred its response
    pub fn respond(
        &self,
        responder: &Responder,
        result: Result<Vec<Value>, InvocationError>,
    ) -> Result<(), CohortServerError> {
        responder.respond(result)
    }

    /// Pushes an unsolicited notification to one connection
    pub fn notify(
        &mut self,
        connection: ConnectionKey,
        module: &str,
        procedure: &str,
        args: Vec<Value>,
    ) -> Result<(), CohortServerError> {
        let Some(client_oid) = self.client_oid(connection) else {
            return Err(CohortServerError::UnknownConnection { connection });
        };
        let notification = InvocationNotification {
            module: module.to_string(),
            code: ProcedureCode::of(procedure),
            args,
        };
        self.sender.post(notification.to_event(client_oid))
    }

    // Processing

    /// Must be called regularly, applies queued events and sweeps evictions
    pub fn process(&mut self) -> ServerEvents {
        self.process_at(Instant::now())
    }

    pub fn process_at(&mut self, now: Instant) -> ServerEvents {
        self.clock = self.clock.max(now);
        let mut processed = 0;
        while processed < self.config.max_events_per_process {
            let Ok(queued) = self.receiver.try_recv() else {
                break;
            };
            processed += 1;
            match queued {
                Queued::Post { event, origin } => self.handle_post(event, origin),
                Queued::Destroy(oid) => self.destroy_now(oid),
            }
        }

        for oid in self.registry.due_evictions(now) {
            if self.registry.subscriber_count(oid) == 0 && self.directory.is_ephemeral(oid) {
                self.evict(oid);
            }
        }

        self.incoming_events.set_processed(processed);
        mem::replace(&mut self.incoming_events, ServerEvents::new())
    }

    // Private

    fn create(
        &mut self,
        schema: Arc<Schema>,
        attributes: Vec<(String, Value)>,
        ephemeral: bool,
    ) -> Result<Oid, CohortServerError> {
        let (oid, added) = self.directory.create_object(schema, attributes, ephemeral)?;
        self.notify_global(&added);
        Ok(oid)
    }

    fn install_resolved(&mut self, oid: Oid, resolved: ResolvedObject) -> bool {
        let ResolvedObject { schema, attributes } = resolved;
        match self.directory.insert_object(oid, schema, attributes, true) {
            Ok(added) => {
                self.notify_global(&added);
                true
            }
            Err(error) => {
                warn!("Server Error: resolved object {} rejected: {}", oid, error);
                self.incoming_events.push_error(error.into());
                false
            }
        }
    }

    fn receive_remote_event(&mut self, connection: ConnectionKey, event: Event) {
        let subscriber = Subscriber::Remote(connection);
        if !self.remote_post_allowed(connection, &event) {
            let oid = event.target();
            warn!("Server Error: {} may not post {:?} to {}", subscriber, event.event_type(), oid);
            self.incoming_events
                .push_error(CohortServerError::AccessDenied {
                    subscriber,
                    oid,
                    event_type: format!("{:?}", event.event_type()),
                });
            self.send_packet(
                connection,
                &Packet::PostFailed {
                    oid,
                    reason: FailureReason::AccessDenied,
                },
            );
            return;
        }
        if self.access.can_mutate(&subscriber, &event, &self.directory) {
            if let Err(error) = self.sender.post_from(event, Origin::Remote(connection)) {
                self.incoming_events.push_error(error);
            }
            return;
        }

        let oid = event.target();
        warn!("Server Error: {} may not post to {}", subscriber, oid);
        self.incoming_events
            .push_error(CohortServerError::AccessDenied {
                subscriber,
                oid,
                event_type: format!("{:?}", event.event_type()),
            });
        self.send_packet(
            connection,
            &Packet::PostFailed {
                oid,
                reason: FailureReason::AccessDenied,
            },
        );

        // A refused request still owes its caller an answer
        if oid == self.invocation_oid {
            if let (Some(source), Some((REQUEST_NAME, args))) = (event.source(), event.as_message()) {
                if let Ok(request) = InvocationRequest::from_args(args.to_vec()) {
                    let error = InvocationError::AccessDenied(format!(
                        "{} may not invoke {}{}",
                        subscriber, request.module, request.code
                    ));
                    let response = InvocationResponse::failed(request.id, &error);
                    if let Err(error) = self.sender.post(response.to_event(source)) {
                        self.incoming_events.push_error(error);
                    }
                }
            }
        }
    }

    // Client objects and the invocation object belong to the server. A
    // connection may post requests to the invocation object and ordinary
    // events to its own client object; responses and notifications are only
    // ever produced here.
    fn remote_post_allowed(&self, connection: ConnectionKey, event: &Event) -> bool {
        let oid = event.target();
        if let Some(owner) = self.client_connections.get(&oid) {
            if *owner != connection {
                return false;
            }
        }
        match event.as_message() {
            Some((RESPONSE_NAME | NOTIFICATION_NAME, _)) => false,
            Some((REQUEST_NAME, _)) => oid == self.invocation_oid,
            _ => oid != self.invocation_oid,
        }
    }

    fn handle_post(&mut self, event: Event, origin: Origin) {
        let oid = event.target();
        let committed = match self.directory.apply(event) {
            Ok(committed) => committed,
            Err(error) => {
                warn!("Server Error: dropped event for {}: {}", oid, error);
                if let Origin::Remote(connection) = origin {
                    self.send_packet(
                        connection,
                        &Packet::PostFailed {
                            oid,
                            reason: error.failure_reason(),
                        },
                    );
                }
                self.incoming_events.push_error(error.into());
                return;
            }
        };

        self.fan_out(&committed);

        if oid == self.invocation_oid {
            self.handle_invocation(committed);
        }
    }

    fn handle_invocation(&mut self, event: Event) {
        let Some(caller) = event.source() else {
            warn!("Server Error: invocation request without a source");
            return;
        };
        let Some((name, args)) = event.into_message() else {
            return;
        };
        if name != REQUEST_NAME {
            return;
        }
        let Some(connection) = self.client_connections.get(&caller).copied() else {
            warn!("Server Error: invocation request from unattached {}", caller);
            return;
        };
        let request = match InvocationRequest::from_args(args) {
            Ok(request) => request,
            Err(error) => {
                warn!("Server Error: malformed invocation request from {}: {}", caller, error);
                self.incoming_events
                    .push_error(CohortServerError::Invocation { origin: caller, error });
                return;
            }
        };

        let id = request.id;
        let context =
            InvocationContext::new(connection, caller, id, &self.directory, &self.sender);
        let response = match self.invocation.dispatch(request, &context) {
            Ok(None) => return,
            Ok(Some(args)) => InvocationResponse::processed(id, args),
            Err(error) => {
                let response = InvocationResponse::failed(id, &error);
                self.incoming_events
                    .push_error(CohortServerError::Invocation { origin: caller, error });
                response
            }
        };
        if let Err(error) = self.sender.post(response.to_event(caller)) {
            self.incoming_events.push_error(error);
        }
    }

    fn release_interest(&mut self, oid: Oid) {
        if !self.directory.is_ephemeral(oid) {
            return;
        }
        match self.registry.policy() {
            EvictionPolicy::Immediate => self.evict(oid),
            EvictionPolicy::Debounced(_) => self.registry.schedule_eviction(oid, self.clock),
        }
    }

    fn evict(&mut self, oid: Oid) {
        info!("evicting {}, no subscribers remain", oid);
        self.destroy_now(oid);
        self.incoming_events.push_eviction(oid);
    }

    fn destroy_now(&mut self, oid: Oid) {
        let Some(removed) = self.directory.destroy_object(oid) else {
            self.incoming_events
                .push_error(DirectoryError::UnknownTarget { oid }.into());
            return;
        };
        self.fan_out(&removed);
        self.notify_global(&removed);
        self.registry.clear_object(oid);
    }

    fn fan_out(&mut self, event: &Event) {
        let subscribers = self.registry.subscribers(event.target()).to_vec();
        let mut payload: Option<Box<[u8]>> = None;
        for subscriber in subscribers {
            match subscriber {
                Subscriber::Local(key) => self.deliver_local(key, event),
                Subscriber::Remote(connection) => {
                    let bytes = payload
                        .get_or_insert_with(|| Packet::ForwardEvent(event.clone()).to_bytes());
                    send_bytes(
                        &self.connections,
                        &mut self.incoming_events,
                        connection,
                        bytes,
                    );
                }
            }
        }
    }

    fn notify_global(&mut self, event: &Event) {
        for key in self.directory.global_listeners().to_vec() {
            self.deliver_local(key, event);
        }
    }

    fn deliver_local(&mut self, key: ListenerKey, event: &Event) {
        let Some(listener) = self.listeners.get_mut(&key) else {
            return;
        };
        let sender = &self.sender;
        if panic::catch_unwind(AssertUnwindSafe(|| listener.handle_event(event, sender))).is_err() {
            warn!("Server Error: {} panicked handling an event for {}", key, event.target());
        }
    }

    fn notify_subscribed(&mut self, subscriber: Subscriber, snapshot: Snapshot) {
        match subscriber {
            Subscriber::Local(key) => {
                let Some(listener) = self.listeners.get_mut(&key) else {
                    return;
                };
                let sender = &self.sender;
                let delivered = panic::catch_unwind(AssertUnwindSafe(|| {
                    listener.object_available(&snapshot, sender)
                }));
                if delivered.is_err() {
                    warn!("Server Error: {} panicked receiving {}", key, snapshot.oid);
                }
            }
            Subscriber::Remote(connection) => {
                self.send_packet(connection, &Packet::SubscribeAck(snapshot));
            }
        }
    }

    fn notify_subscribe_failed(&mut self, subscriber: Subscriber, oid: Oid, reason: FailureReason) {
        match subscriber {
            Subscriber::Local(key) => {
                let Some(listener) = self.listeners.get_mut(&key) else {
                    return;
                };
                let failed =
                    panic::catch_unwind(AssertUnwindSafe(|| listener.request_failed(oid, &reason)));
                if failed.is_err() {
                    warn!("Server Error: {} panicked on failed subscribe to {}", key, oid);
                }
            }
            Subscriber::Remote(connection) => {
                self.send_packet(connection, &Packet::SubscribeFail { oid, reason });
            }
        }
    }

    fn unexpected_packet(&mut self, connection: ConnectionKey, packet: &'static str) {
        warn!("Server Error: unexpected {} packet from {}", packet, connection);
        self.incoming_events
            .push_error(CohortServerError::UnexpectedPacket { connection, packet });
    }

    fn send_packet(&mut self, connection: ConnectionKey, packet: &Packet) {
        send_bytes(
            &self.connections,
            &mut self.incoming_events,
            connection,
            &packet.to_bytes(),
        );
    }
}

fn send_bytes(
    connections: &HashMap<ConnectionKey, Connection>,
    events: &mut ServerEvents,
    connection: ConnectionKey,
    payload: &[u8],
) {
    let Some(target) = connections.get(&connection) else {
        warn!("Server Error: cannot send to unknown {}", connection);
        return;
    };
    if let Err(error) = target.sender.send(payload) {
        warn!("Server Error: cannot send packet to {}: {}", connection, error);
        events.push_error(CohortServerError::Send { connection, error });
    }
}
