//! Lifecycle Emitter
//!
//! Named-event listeners attached to a view. Listeners run in registration
//! order; a `once` listener is dropped before it runs.

type Listener = Box<dyn FnMut(&str)>;

/// Subscription handle returned by `Emitter::on`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

struct Subscription {
    id: SubscriptionId,
    event: String,
    once: bool,
    listener: Listener,
}

/// Event emitter
pub struct Emitter {
    subscriptions: Vec<Subscription>,
    next_id: u64,
}

impl Default for Emitter {
    fn default() -> Self {
        Self {
            subscriptions: Vec::new(),
            next_id: 1,
        }
    }
}

impl std::fmt::Debug for Emitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen for `event`
    pub fn on(&mut self, event: &str, listener: impl FnMut(&str) + 'static) -> SubscriptionId {
        self.subscribe(event, false, Box::new(listener))
    }

    /// Listen for the next `event` only
    pub fn once(&mut self, event: &str, listener: impl FnMut(&str) + 'static) -> SubscriptionId {
        self.subscribe(event, true, Box::new(listener))
    }

    fn subscribe(&mut self, event: &str, once: bool, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            event: event.to_string(),
            once,
            listener,
        });
        id
    }

    /// Remove one subscription, or every listener for `event` when `id` is `None`
    pub fn off(&mut self, event: &str, id: Option<SubscriptionId>) -> usize {
        let before = self.subscriptions.len();
        self.subscriptions
            .retain(|s| !(s.event == event && id.is_none_or(|id| s.id == id)));
        before - self.subscriptions.len()
    }

    /// Deliver `event`; returns the number of listeners called
    pub fn emit(&mut self, event: &str) -> usize {
        let mut called = 0;
        let mut index = 0;
        while index < self.subscriptions.len() {
            if self.subscriptions[index].event != event {
                index += 1;
                continue;
            }
            if self.subscriptions[index].once {
                let mut subscription = self.subscriptions.remove(index);
                (subscription.listener)(event);
            } else {
                (self.subscriptions[index].listener)(event);
                index += 1;
            }
            called += 1;
        }
        tracing::trace!("Emitted {} to {} listener(s)", event, called);
        called
    }

    /// Number of listeners for `event`
    pub fn listener_count(&self, event: &str) -> usize {
        self.subscriptions.iter().filter(|s| s.event == event).count()
    }
}
