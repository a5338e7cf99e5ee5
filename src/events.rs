//! Typed publish/subscribe channel.
//!
//! Stores publish snapshots after each mutation; views subscribe on mount and
//! drop the returned [`Subscription`] on unmount.

use std::cell::RefCell;
use std::rc::Rc;

use crate::model::clicker::Achievement;
use crate::model::MiniGame;

type Listener<E> = Rc<dyn Fn(&E)>;

struct Registry<E> {
    next_id: u64,
    listeners: Vec<(u64, Listener<E>)>,
}

pub struct EventBus<E> {
    inner: Rc<RefCell<Registry<E>>>,
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<E> PartialEq for EventBus<E> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<E: 'static> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> EventBus<E> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Registry {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    pub fn subscribe<F: Fn(&E) + 'static>(&self, listener: F) -> Subscription {
        let id = {
            let mut reg = self.inner.borrow_mut();
            let id = reg.next_id;
            reg.next_id += 1;
            reg.listeners.push((id, Rc::new(listener)));
            id
        };
        let registry = Rc::downgrade(&self.inner);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(reg) = registry.upgrade() {
                    reg.borrow_mut().listeners.retain(|(i, _)| *i != id);
                }
            })),
        }
    }

    /// Delivers to the subscribers registered when the call starts. Listeners
    /// may subscribe, unsubscribe or publish from inside the callback.
    pub fn publish(&self, event: &E) {
        let snapshot: Vec<Listener<E>> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in snapshot {
            listener(event);
        }
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

/// Unsubscribes when dropped.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// Application-wide notifications.
#[derive(Clone, Debug, PartialEq)]
pub enum AppEvent {
    AchievementUnlocked(Achievement),
    SecretDiscovered,
    GameOver { game: MiniGame, score: u32 },
    NewHighScore { game: MiniGame, score: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn delivers_to_all_subscribers() {
        let bus = EventBus::<u32>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let a = {
            let seen = seen.clone();
            bus.subscribe(move |v| seen.borrow_mut().push(("a", *v)))
        };
        let b = {
            let seen = seen.clone();
            bus.subscribe(move |v| seen.borrow_mut().push(("b", *v)))
        };
        bus.publish(&3);
        assert_eq!(*seen.borrow(), vec![("a", 3), ("b", 3)]);
        drop((a, b));
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let bus = EventBus::<()>::new();
        let hits = Rc::new(Cell::new(0));
        let sub = {
            let hits = hits.clone();
            bus.subscribe(move |_| hits.set(hits.get() + 1))
        };
        bus.publish(&());
        assert_eq!(bus.subscriber_count(), 1);
        drop(sub);
        bus.publish(&());
        assert_eq!(hits.get(), 1);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn reentrant_publish_and_unsubscribe_do_not_panic() {
        let bus = EventBus::<u8>::new();
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let hits = Rc::new(Cell::new(0));
        let sub = {
            let bus2 = bus.clone();
            let slot = slot.clone();
            let hits = hits.clone();
            bus.subscribe(move |v| {
                hits.set(hits.get() + 1);
                if *v == 0 {
                    bus2.publish(&1);
                    slot.borrow_mut().take();
                }
            })
        };
        *slot.borrow_mut() = Some(sub);
        bus.publish(&0);
        assert_eq!(hits.get(), 2);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn subscription_outliving_bus_is_harmless() {
        let bus = EventBus::<()>::new();
        let sub = bus.subscribe(|_| {});
        drop(bus);
        drop(sub);
    }
}
