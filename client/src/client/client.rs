use std::{
    mem,
    time::{Duration, Instant},
};

use log::{info, warn};

use cohort_shared::{
    Event, InvocationId, Marshaller, Oid, Packet, PacketSender, SharedObject, Value,
    NOTIFICATION_NAME, RESPONSE_NAME,
};

use crate::{
    events::ClientEvents,
    invocation::{
        deadline, response_channel, InvocationDirector, InvocationReceiver, ResponseReceiver,
        ResponseTarget,
    },
    proxy::ProxyDirectory,
    ClientConfig, CohortClientError,
};

struct Bootstrap {
    client_oid: Oid,
    invocation_oid: Oid,
}

/// One connection's view of a cohort server: proxies of subscribed objects
/// and the caller side of invocation services. Incoming bytes are handed to
/// [`Client::receive_packet`]; [`Client::process`] sweeps timeouts and
/// collects what happened.
pub struct Client {
    config: ClientConfig,
    sender: Option<Box<dyn PacketSender>>,
    bootstrap: Option<Bootstrap>,
    proxies: ProxyDirectory,
    invocation: InvocationDirector,
    incoming_events: ClientEvents,
}

impl Client {
    /// Create a new Client sending through `sender`. The client is ready once
    /// the server's bootstrap packet has been received.
    pub fn new(config: ClientConfig, sender: Box<dyn PacketSender>) -> Self {
        Self {
            config,
            sender: Some(sender),
            bootstrap: None,
            proxies: ProxyDirectory::new(),
            invocation: InvocationDirector::new(),
            incoming_events: ClientEvents::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn is_ready(&self) -> bool {
        self.sender.is_some() && self.bootstrap.is_some()
    }

    /// This connection's client object, where responses and notifications
    /// arrive
    pub fn client_oid(&self) -> Option<Oid> {
        self.bootstrap.as_ref().map(|bootstrap| bootstrap.client_oid)
    }

    pub fn invocation_oid(&self) -> Option<Oid> {
        self.bootstrap
            .as_ref()
            .map(|bootstrap| bootstrap.invocation_oid)
    }

    // Packets

    /// Handles one packet received from the server
    pub fn receive_packet(&mut self, payload: &[u8]) {
        let packet = match Packet::from_bytes(payload) {
            Ok(packet) => packet,
            Err(error) => {
                warn!("Client Error: malformed packet from server: {}", error);
                self.incoming_events.push_error(error.into());
                return;
            }
        };

        match packet {
            Packet::Bootstrap {
                client_oid,
                invocation_oid,
            } => {
                info!("attached with client object {}", client_oid);
                self.bootstrap = Some(Bootstrap {
                    client_oid,
                    invocation_oid,
                });
                self.incoming_events.push_connection(client_oid);
            }
            Packet::SubscribeAck(snapshot) => {
                let oid = snapshot.oid;
                match self.proxies.subscribe_acknowledged(snapshot) {
                    Ok(oid) => self.incoming_events.push_subscription(oid),
                    Err(error) => {
                        warn!("Client Error: unusable snapshot for {}: {}", oid, error);
                        self.incoming_events
                            .push_error(CohortClientError::Object { oid, error });
                    }
                }
            }
            Packet::SubscribeFail { oid, reason } => {
                warn!("Client Error: subscription to {} failed: {}", oid, reason);
                self.proxies.subscribe_failed(oid);
                self.incoming_events.push_subscribe_failure(oid, reason);
            }
            Packet::ForwardEvent(event) => self.receive_event(event),
            Packet::PostFailed { oid, reason } => {
                warn!("Client Error: event for {} was refused: {}", oid, reason);
                self.incoming_events.push_post_failure(oid, reason);
            }
            Packet::Subscribe { .. } => self.unexpected_packet("Subscribe"),
            Packet::Unsubscribe { .. } => self.unexpected_packet("Unsubscribe"),
        }
    }

    // Objects

    /// Requests a proxy of `oid`. The outcome arrives as a `SubscribeEvent`
    /// or `SubscribeFailEvent`; nothing is sent if the proxy is already held
    /// or requested.
    pub fn subscribe(&mut self, oid: Oid) -> Result<(), CohortClientError> {
        self.ready_sender()?;
        if self.proxies.request(oid) {
            if let Err(error) = self.send_packet(&Packet::Subscribe { oid }) {
                self.proxies.subscribe_failed(oid);
                return Err(error);
            }
        }
        Ok(())
    }

    /// Drops the proxy of `oid`. Unsubscribing from something not held is a
    /// no-op.
    pub fn unsubscribe(&mut self, oid: Oid) -> Result<(), CohortClientError> {
        if !self.proxies.release(oid) {
            return Ok(());
        }
        self.send_packet(&Packet::Unsubscribe { oid })
    }

    pub fn object(&self, oid: Oid) -> Option<&SharedObject> {
        self.proxies.get(oid)
    }

    pub fn proxies(&self) -> &ProxyDirectory {
        &self.proxies
    }

    /// Sends an event to the server. The proxy changes only once the server
    /// has applied it and forwarded it back.
    pub fn post_event(&mut self, event: Event) -> Result<(), CohortClientError> {
        self.ready_sender()?;
        self.send_packet(&Packet::ForwardEvent(event))
    }

    // Invocation

    /// Calls `procedure`, delivering the outcome to `target`. Uses the
    /// configured default timeout.
    pub fn invoke<T: ResponseTarget + 'static>(
        &mut self,
        marshaller: &Marshaller,
        procedure: &str,
        args: Vec<Value>,
        target: T,
    ) -> Result<InvocationId, CohortClientError> {
        let timeout = self.config.default_timeout;
        self.issue(marshaller, procedure, args, Some(Box::new(target)), timeout)
    }

    pub fn invoke_with_timeout<T: ResponseTarget + 'static>(
        &mut self,
        marshaller: &Marshaller,
        procedure: &str,
        args: Vec<Value>,
        target: T,
        timeout: Duration,
    ) -> Result<InvocationId, CohortClientError> {
        self.issue(marshaller, procedure, args, Some(Box::new(target)), Some(timeout))
    }

    /// Calls `procedure`, returning a future of its outcome
    pub fn call(
        &mut self,
        marshaller: &Marshaller,
        procedure: &str,
        args: Vec<Value>,
    ) -> Result<ResponseReceiver, CohortClientError> {
        let (sender, receiver) = response_channel();
        self.invoke(marshaller, procedure, args, sender)?;
        Ok(receiver)
    }

    /// Calls `procedure` without waiting for any response
    pub fn send(
        &mut self,
        marshaller: &Marshaller,
        procedure: &str,
        args: Vec<Value>,
    ) -> Result<(), CohortClientError> {
        self.issue(marshaller, procedure, args, None, None)?;
        Ok(())
    }

    pub fn register_receiver<R: InvocationReceiver + 'static>(
        &mut self,
        module: &str,
        receiver: R,
    ) -> Result<(), CohortClientError> {
        self.invocation
            .register_receiver(module, Box::new(receiver))?;
        Ok(())
    }

    pub fn is_pending(&self, id: InvocationId) -> bool {
        self.invocation.is_pending(id)
    }

    pub fn pending_count(&self) -> usize {
        self.invocation.pending_count()
    }

    // Processing

    /// Must be called regularly, expires timed out calls and returns what
    /// happened since the last call
    pub fn process(&mut self) -> ClientEvents {
        self.process_at(Instant::now())
    }

    pub fn process_at(&mut self, now: Instant) -> ClientEvents {
        self.invocation.check_timeouts(now);
        mem::replace(&mut self.incoming_events, ClientEvents::new())
    }

    /// Reports that the transport is gone. Every pending call fails with
    /// `ConnectionLost` before this returns, and all proxies are dropped.
    pub fn connection_lost(&mut self) {
        let failed = self.invocation.connection_lost();
        self.sender = None;
        self.bootstrap = None;
        self.proxies.clear();
        info!("connection lost, failed {} pending invocations", failed);
        self.incoming_events.push_disconnection();
    }

    // Private

    fn issue(
        &mut self,
        marshaller: &Marshaller,
        procedure: &str,
        args: Vec<Value>,
        target: Option<Box<dyn ResponseTarget>>,
        timeout: Option<Duration>,
    ) -> Result<InvocationId, CohortClientError> {
        let invocation_oid = self.ready_sender()?;
        let deadline = deadline(Instant::now(), timeout);
        let request = self
            .invocation
            .invoke(marshaller, procedure, args, target, deadline)?;
        let id = request.id;
        if let Err(error) = self.send_packet(&Packet::ForwardEvent(request.to_event(invocation_oid)))
        {
            self.invocation.abandon(id);
            return Err(error);
        }
        Ok(id)
    }

    fn receive_event(&mut self, event: Event) {
        let event = match self.proxies.apply(event) {
            Ok(event) => event,
            Err(error) => {
                warn!("Client Error: {}", error);
                self.incoming_events.push_error(error);
                return;
            }
        };

        let invocation_traffic = Some(event.target()) == self.client_oid()
            && matches!(
                event.as_message(),
                Some((RESPONSE_NAME | NOTIFICATION_NAME, _))
            );
        if invocation_traffic {
            self.route_invocation(event);
            return;
        }
        self.incoming_events.push_object_event(event);
    }

    fn route_invocation(&mut self, event: Event) {
        let Some((name, args)) = event.into_message() else {
            return;
        };
        let routed = if name == RESPONSE_NAME {
            self.invocation.handle_response(args).map(|_| ())
        } else {
            self.invocation.handle_notification(args)
        };
        if let Err(error) = routed {
            self.incoming_events.push_error(error);
        }
    }

    /// The invocation object, if the connection is up and bootstrapped
    fn ready_sender(&self) -> Result<Oid, CohortClientError> {
        match (&self.sender, &self.bootstrap) {
            (Some(_), Some(bootstrap)) => Ok(bootstrap.invocation_oid),
            _ => Err(CohortClientError::NotConnected),
        }
    }

    fn unexpected_packet(&mut self, packet: &'static str) {
        warn!("Client Error: unexpected {} packet from server", packet);
        self.incoming_events
            .push_error(CohortClientError::UnexpectedPacket { packet });
    }

    fn send_packet(&self, packet: &Packet) -> Result<(), CohortClientError> {
        let Some(sender) = &self.sender else {
            return Err(CohortClientError::NotConnected);
        };
        sender.send(&packet.to_bytes())?;
        Ok(())
    }
}
