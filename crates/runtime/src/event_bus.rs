/// Event stamped with its emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event<E> {
    pub seq: u64,
    pub payload: E,
}

/// Append-only queue of typed events, drained by the consumer.
///
/// Ordering contract: events come back in emission order and `seq` is strictly
/// increasing for the lifetime of the bus (draining does not reset it).
#[derive(Debug)]
pub struct EventBus<E> {
    next_seq: u64,
    events: Vec<Event<E>>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self {
            next_seq: 0,
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, payload: E) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.events.push(Event { seq, payload });
    }

    pub fn drain(&mut self) -> Vec<Event<E>> {
        std::mem::take(&mut self.events)
    }
}
