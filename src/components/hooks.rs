use gloo::events::{EventListener, EventListenerOptions};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::KeyboardEvent;
use yew::prelude::*;

use crate::events::EventBus;

/// Latest value published on `bus`, starting from `initial`.
#[hook]
pub fn use_bus_value<T>(bus: EventBus<T>, initial: T) -> T
where
    T: Clone + 'static,
{
    let value = use_state(move || initial);
    {
        let value = value.clone();
        use_effect_with(bus, move |bus| {
            let sub = bus.subscribe(move |v: &T| value.set(v.clone()));
            move || drop(sub)
        });
    }
    (*value).clone()
}

type KeyHandler = Rc<dyn Fn(&KeyboardEvent) -> bool>;

/// Window-level key handler attached for the component's lifetime.
/// `handler` returns true when it consumed the key; the browser default is
/// then prevented.
#[hook]
pub fn use_window_keys<F>(kind: &'static str, handler: F)
where
    F: Fn(&KeyboardEvent) -> bool + 'static,
{
    let latest = use_mut_ref(|| None::<KeyHandler>);
    // Swapped every render so the listener sees current state.
    *latest.borrow_mut() = Some(Rc::new(handler));
    use_effect_with(kind, move |kind| {
        let listener = web_sys::window().map(|window| {
            EventListener::new_with_options(
                &window,
                *kind,
                EventListenerOptions::enable_prevent_default(),
                move |e| {
                    let Some(e) = e.dyn_ref::<KeyboardEvent>() else {
                        return;
                    };
                    let f = latest.borrow().clone();
                    if let Some(f) = f {
                        if f(e) {
                            e.prevent_default();
                        }
                    }
                },
            )
        });
        move || drop(listener)
    });
}
