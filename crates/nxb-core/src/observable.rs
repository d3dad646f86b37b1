//! Change notification for presentation models.
//!
//! Rows hold a [`Notifier`] and call [`Notifier::notify`] with the field name
//! after every setter. Front-ends subscribe a callback to redraw whatever is
//! bound to that field.

use std::fmt;
use std::sync::{Arc, RwLock};

/// Event fired after a property has been assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyChanged {
    /// Name of the property, in the casing the front-end binds to.
    pub property: &'static str,
}

/// Handle returned by [`Notifier::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Arc<dyn Fn(&PropertyChanged) + Send + Sync>;

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    callbacks: Vec<(SubscriptionId, Callback)>,
}

/// A list of subscriber callbacks shared by the fields of one model.
///
/// Cloning a notifier shares the subscriber list.
#[derive(Clone, Default)]
pub struct Notifier {
    subscribers: Arc<RwLock<Subscribers>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback invoked for every subsequent property change.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&PropertyChanged) + Send + Sync + 'static,
    {
        let mut subscribers = self
            .subscribers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let id = SubscriptionId(subscribers.next_id);
        subscribers.next_id += 1;
        subscribers.callbacks.push((id, Arc::new(callback)));
        id
    }

    /// Removes a callback. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self
            .subscribers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = subscribers.callbacks.len();
        subscribers.callbacks.retain(|(existing, _)| *existing != id);
        subscribers.callbacks.len() != before
    }

    /// Calls every subscriber, in subscription order.
    pub fn notify(&self, property: &'static str) {
        // Snapshot so a callback may subscribe or unsubscribe without deadlocking.
        let callbacks: Vec<Callback> = {
            let subscribers = self
                .subscribers
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            subscribers
                .callbacks
                .iter()
                .map(|(_, callback)| callback.clone())
                .collect()
        };

        let event = PropertyChanged { property };
        for callback in callbacks {
            callback(&event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .map(|subscribers| subscribers.callbacks.len())
            .unwrap_or(0)
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Observable boolean used for the busy indicator.
///
/// While busy, front-ends show a progress marker and refuse input.
#[derive(Debug, Clone, Default)]
pub struct BusyState {
    busy: Arc<RwLock<bool>>,
    notifier: Notifier,
}

impl BusyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.read().map(|busy| *busy).unwrap_or(false)
    }

    pub fn set_busy(&self, busy: bool) {
        {
            let mut guard = self.busy.write().unwrap_or_else(|poisoned| poisoned.into_inner());
            *guard = busy;
        }
        self.notifier.notify("IsBusy");
    }

    /// Marks busy until the returned guard is dropped.
    pub fn enter(&self) -> BusyGuard {
        self.set_busy(true);
        BusyGuard {
            state: self.clone(),
        }
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

/// Clears the busy flag on drop.
#[must_use = "the busy flag is cleared as soon as the guard is dropped"]
pub struct BusyGuard {
    state: BusyState,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.state.set_busy(false);
    }
}
