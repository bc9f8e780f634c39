use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use cohort_shared::{Oid, Snapshot};

use crate::{subscription::eviction::EvictionQueue, ConnectionKey, EvictionPolicy, Subscriber};

/// Result of a granted subscribe request
#[derive(Debug, Clone, PartialEq)]
pub enum SubscribeOutcome {
    /// The object was available; the snapshot is its state as of
    /// registration, and every later event will follow
    Subscribed(Snapshot),
    /// The object is being resolved; the subscriber will be told the result
    /// exactly once
    Pending,
}

/// Result of an unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unsubscribed {
    /// The subscriber was not registered; nothing changed
    NotSubscribed,
    /// Removed; `remaining` subscribers are left on the object
    Removed { remaining: usize },
}

/// Who is interested in which object, and which objects are waiting to be
/// resolved or evicted
pub struct SubscriptionRegistry {
    subscribers: HashMap<Oid, Vec<Subscriber>>,
    pending: HashMap<Oid, Vec<Subscriber>>,
    evictions: EvictionQueue,
    policy: EvictionPolicy,
}

impl SubscriptionRegistry {
    pub fn new(policy: EvictionPolicy) -> Self {
        Self {
            subscribers: HashMap::new(),
            pending: HashMap::new(),
            evictions: EvictionQueue::default(),
            policy,
        }
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    /// Registers a subscriber; returns false if it was already registered.
    /// Cancels any eviction scheduled for the object.
    pub fn add(&mut self, oid: Oid, subscriber: Subscriber) -> bool {
        self.evictions.cancel(oid);
        let list = self.subscribers.entry(oid).or_default();
        if list.contains(&subscriber) {
            return false;
        }
        list.push(subscriber);
        true
    }

    pub fn remove(&mut self, oid: Oid, subscriber: Subscriber) -> Unsubscribed {
        if let Some(waiting) = self.pending.get_mut(&oid) {
            if let Some(position) = waiting.iter().position(|other| *other == subscriber) {
                waiting.remove(position);
                return Unsubscribed::Removed { remaining: 0 };
            }
        }
        let Some(list) = self.subscribers.get_mut(&oid) else {
            return Unsubscribed::NotSubscribed;
        };
        let Some(position) = list.iter().position(|other| *other == subscriber) else {
            return Unsubscribed::NotSubscribed;
        };
        list.remove(position);
        let remaining = list.len();
        if remaining == 0 {
            self.subscribers.remove(&oid);
        }
        Unsubscribed::Removed { remaining }
    }

    pub fn is_subscribed(&self, oid: Oid, subscriber: Subscriber) -> bool {
        self.subscribers
            .get(&oid)
            .map(|list| list.contains(&subscriber))
            .unwrap_or(false)
    }

    /// Subscribers of an object, in registration order
    pub fn subscribers(&self, oid: Oid) -> &[Subscriber] {
        self.subscribers
            .get(&oid)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn subscriber_count(&self, oid: Oid) -> usize {
        self.subscribers(oid).len()
    }

    /// Drops every subscription to an object that no longer exists
    pub fn clear_object(&mut self, oid: Oid) -> Vec<Subscriber> {
        self.evictions.cancel(oid);
        self.subscribers.remove(&oid).unwrap_or_default()
    }

    /// Drops every subscription held by one subscriber, returning the
    /// objects it was subscribed to
    pub fn remove_subscriber(&mut self, subscriber: Subscriber) -> Vec<Oid> {
        for waiting in self.pending.values_mut() {
            waiting.retain(|other| *other != subscriber);
        }
        let mut oids = Vec::new();
        self.subscribers.retain(|oid, list| {
            if let Some(position) = list.iter().position(|other| *other == subscriber) {
                list.remove(position);
                oids.push(*oid);
            }
            !list.is_empty()
        });
        oids.sort();
        oids
    }

    pub fn remove_connection(&mut self, connection: ConnectionKey) -> Vec<Oid> {
        self.remove_subscriber(Subscriber::Remote(connection))
    }

    // Resolution

    /// Queues a subscriber behind an in-flight resolution. Returns true if
    /// this is the first waiter, meaning resolution should begin now.
    pub fn add_pending(&mut self, oid: Oid, subscriber: Subscriber) -> bool {
        let first = !self.pending.contains_key(&oid);
        let waiting = self.pending.entry(oid).or_default();
        if !waiting.contains(&subscriber) {
            waiting.push(subscriber);
        }
        first
    }

    pub fn is_pending(&self, oid: Oid) -> bool {
        self.pending.contains_key(&oid)
    }

    pub fn take_pending(&mut self, oid: Oid) -> Vec<Subscriber> {
        self.pending.remove(&oid).unwrap_or_default()
    }

    // Eviction

    pub fn schedule_eviction(&mut self, oid: Oid, now: Instant) {
        self.evictions.schedule(oid, now);
    }

    pub fn is_eviction_scheduled(&self, oid: Oid) -> bool {
        self.evictions.is_scheduled(oid)
    }

    /// Objects whose idle period has elapsed under a debounced policy.
    /// Under `Immediate` nothing is ever left scheduled.
    pub fn due_evictions(&mut self, now: Instant) -> Vec<Oid> {
        match self.policy {
            EvictionPolicy::Immediate => self.evictions.sweep(now, Duration::ZERO),
            EvictionPolicy::Debounced(delay) => self.evictions.sweep(now, delay),
        }
    }
}
