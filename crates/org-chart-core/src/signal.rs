//! Chart-scoped signals
//!
//! A small single-threaded pub/sub owned by one tree view. Cards publish
//! `Drag` while moving; the connector overlay listens and recomputes. `Reset`
//! zeroes every card offset and schedules a trailing `Drag` for the next
//! frame, once the zeroed cards have been painted.
//!
//! Two charts never see each other's signals because each owns its hub.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Signal kinds carried by the hub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartSignal {
    /// A card moved, or the chart origin changed; recompute connectors
    Drag,
    /// Zero every card offset
    Reset,
}

impl ChartSignal {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Drag => "org-chart-drag",
            Self::Reset => "org-chart-reset",
        }
    }
}

/// Which signals a subscriber wants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalFilter {
    All,
    Only(ChartSignal),
}

impl SignalFilter {
    fn matches(&self, signal: ChartSignal) -> bool {
        match self {
            Self::All => true,
            Self::Only(s) => *s == signal,
        }
    }
}

impl From<ChartSignal> for SignalFilter {
    fn from(signal: ChartSignal) -> Self {
        Self::Only(signal)
    }
}

type Callback = Rc<dyn Fn(ChartSignal)>;

struct Subscriber {
    id: u64,
    filter: SignalFilter,
    callback: Callback,
}

#[derive(Default)]
struct HubState {
    next_id: u64,
    subscribers: Vec<Subscriber>,
    /// Published from inside a callback, delivered after the current dispatch
    queued: VecDeque<ChartSignal>,
    dispatching: bool,
    /// Waiting for the next `begin_frame`
    deferred: Vec<ChartSignal>,
}

/// Handle to a chart's signal hub; clones share the same hub
#[derive(Clone, Default)]
pub struct SignalHub {
    state: Rc<RefCell<HubState>>,
}

impl std::fmt::Debug for SignalHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("SignalHub")
            .field("subscribers", &state.subscribers.len())
            .field("deferred", &state.deferred)
            .finish()
    }
}

impl SignalHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback; it stays registered until the guard is dropped
    #[must_use = "dropping the Subscription unsubscribes immediately"]
    pub fn subscribe(
        &self,
        filter: impl Into<SignalFilter>,
        callback: impl Fn(ChartSignal) + 'static,
    ) -> Subscription {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        state.subscribers.push(Subscriber {
            id,
            filter: filter.into(),
            callback: Rc::new(callback),
        });
        Subscription {
            id,
            state: Rc::downgrade(&self.state),
        }
    }

    /// Deliver to every matching subscriber, in subscription order
    pub fn publish(&self, signal: ChartSignal) {
        {
            let mut state = self.state.borrow_mut();
            state.queued.push_back(signal);
            if state.dispatching {
                return;
            }
            state.dispatching = true;
        }

        loop {
            let next = {
                let mut state = self.state.borrow_mut();
                match state.queued.pop_front() {
                    Some(signal) => {
                        let targets: Vec<Callback> = state
                            .subscribers
                            .iter()
                            .filter(|s| s.filter.matches(signal))
                            .map(|s| Rc::clone(&s.callback))
                            .collect();
                        Some((signal, targets))
                    }
                    None => {
                        state.dispatching = false;
                        None
                    }
                }
            };
            let Some((signal, targets)) = next else {
                break;
            };
            tracing::trace!(signal = signal.name(), subscribers = targets.len(), "publish");
            for callback in targets {
                callback(signal);
            }
        }
    }

    /// Queue a signal for the next frame; repeats within a frame coalesce
    pub fn defer(&self, signal: ChartSignal) {
        let mut state = self.state.borrow_mut();
        if !state.deferred.contains(&signal) {
            state.deferred.push(signal);
        }
    }

    /// Zero offsets now, recompute connectors after the next paint
    pub fn reset(&self) {
        self.publish(ChartSignal::Reset);
        self.defer(ChartSignal::Drag);
    }

    /// Publish whatever was deferred during the previous frame
    pub fn begin_frame(&self) -> usize {
        let deferred = std::mem::take(&mut self.state.borrow_mut().deferred);
        let count = deferred.len();
        for signal in deferred {
            self.publish(signal);
        }
        count
    }

    pub fn has_deferred(&self) -> bool {
        !self.state.borrow().deferred.is_empty()
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.borrow().subscribers.len()
    }
}

/// Subscription guard; unsubscribes on drop
pub struct Subscription {
    id: u64,
    state: std::rc::Weak<RefCell<HubState>>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            // Dispatch never holds the borrow while calling out
            state.borrow_mut().subscribers.retain(|s| s.id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    fn recorder(
        hub: &SignalHub,
        filter: SignalFilter,
    ) -> (Rc<RefCell<Vec<ChartSignal>>>, Subscription) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let sub = hub.subscribe(filter, move |s| sink.borrow_mut().push(s));
        (log, sub)
    }

    #[test]
    fn filter_selects_signal_kind() {
        let hub = SignalHub::new();
        let (drags, _a) = recorder(&hub, ChartSignal::Drag.into());
        let (all, _b) = recorder(&hub, SignalFilter::All);
        hub.publish(ChartSignal::Drag);
        hub.publish(ChartSignal::Reset);
        assert_eq!(*drags.borrow(), vec![ChartSignal::Drag]);
        assert_eq!(*all.borrow(), vec![ChartSignal::Drag, ChartSignal::Reset]);
    }

    #[test]
    fn dropping_guard_unsubscribes() {
        let hub = SignalHub::new();
        let (log, sub) = recorder(&hub, SignalFilter::All);
        assert_eq!(hub.subscriber_count(), 1);
        drop(sub);
        assert_eq!(hub.subscriber_count(), 0);
        hub.publish(ChartSignal::Drag);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn delivery_follows_subscription_order() {
        let hub = SignalHub::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        let subs: Vec<Subscription> = (0..3)
            .map(|i| {
                let order = Rc::clone(&order);
                hub.subscribe(SignalFilter::All, move |_| order.borrow_mut().push(i))
            })
            .collect();
        hub.publish(ChartSignal::Drag);
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
        drop(subs);
    }

    #[test]
    fn publish_from_callback_is_queued() {
        let hub = SignalHub::new();
        let inner = hub.clone();
        let _relay = hub.subscribe(ChartSignal::Reset, move |_| inner.publish(ChartSignal::Drag));
        let (log, _rec) = recorder(&hub, SignalFilter::All);
        hub.publish(ChartSignal::Reset);
        assert_eq!(*log.borrow(), vec![ChartSignal::Reset, ChartSignal::Drag]);
    }

    #[test]
    fn reset_defers_one_drag_to_next_frame() {
        let hub = SignalHub::new();
        let (log, _rec) = recorder(&hub, SignalFilter::All);
        hub.reset();
        hub.reset();
        assert_eq!(*log.borrow(), vec![ChartSignal::Reset, ChartSignal::Reset]);
        assert!(hub.has_deferred());

        assert_eq!(hub.begin_frame(), 1);
        assert_eq!(
            *log.borrow(),
            vec![ChartSignal::Reset, ChartSignal::Reset, ChartSignal::Drag]
        );
        assert_eq!(hub.begin_frame(), 0);
    }

    #[test]
    fn hubs_are_isolated() {
        let a = SignalHub::new();
        let b = SignalHub::new();
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let _sub = a.subscribe(SignalFilter::All, move |_| counter.set(counter.get() + 1));
        b.publish(ChartSignal::Drag);
        assert_eq!(hits.get(), 0);
        a.publish(ChartSignal::Drag);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn signal_names() {
        assert_eq!(ChartSignal::Drag.name(), "org-chart-drag");
        assert_eq!(ChartSignal::Reset.name(), "org-chart-reset");
    }
}
