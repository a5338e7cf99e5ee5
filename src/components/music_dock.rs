use gloo::events::{EventListener, EventListenerOptions};
use gloo::timers::callback::{Interval, Timeout};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlInputElement, TouchEvent};
use yew::prelude::*;

use super::hooks::use_bus_value;
use crate::context::AppContext;
use crate::sound::Cue;
use crate::state::music::{DockDrag, DockPosition, WidgetSignal};
use crate::youtube::{self, YouTubeWidget};
use crate::util::cwarn;

const API_POLL_MS: u32 = 100;

fn viewport() -> (f64, f64) {
    let Some(w) = web_sys::window() else {
        return (0.0, 0.0);
    };
    let width = w.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let height = w.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (width, height)
}

/// Client coordinates of a mouse event or of a touch event's first touch.
fn pointer(e: &Event) -> Option<(f64, f64)> {
    if let Some(e) = e.dyn_ref::<MouseEvent>() {
        return Some((e.client_x() as f64, e.client_y() as f64));
    }
    let touch = e.dyn_ref::<TouchEvent>()?.touches().get(0)?;
    Some((touch.client_x() as f64, touch.client_y() as f64))
}

fn is_touch(e: &Event) -> bool {
    e.type_().starts_with("touch")
}

/// True when the press landed on a button or slider inside the header.
fn on_control(e: &Event) -> bool {
    e.target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        .and_then(|el| el.closest("button, input").ok().flatten())
        .is_some()
}

#[derive(Properties, PartialEq, Clone)]
pub struct MusicDockProps {
    pub ctx: AppContext,
}

#[function_component]
pub fn MusicDock(props: &MusicDockProps) -> Html {
    let ctx = props.ctx.clone();
    let status = {
        let (bus, initial) = {
            let p = ctx.music.borrow();
            (p.changes(), p.status())
        };
        use_bus_value(bus, initial)
    };
    // Subscribed only to re-render; queries go to the store.
    {
        let (bus, initial) = {
            let f = ctx.favorites.borrow();
            (f.changes(), f.snapshot().clone())
        };
        use_bus_value(bus, initial);
    }
    let expanded = use_state(|| false);
    let api_ready = use_state(youtube::api_ready);
    let position = use_state({
        let store = ctx.store.clone();
        move || DockPosition::load(&*store)
    });
    let drag = use_mut_ref(|| None::<DockDrag>);
    let dropped_at = use_mut_ref(|| None::<DockPosition>);
    let dragging = use_state(|| false);

    // Load the iframe API once and wait for it.
    {
        let api_ready = api_ready.clone();
        use_effect_with((), move |_| {
            let poll = if youtube::api_ready() {
                None
            } else {
                youtube::ensure_api_script();
                Some(Interval::new(API_POLL_MS, move || {
                    if youtube::api_ready() {
                        api_ready.set(true);
                    }
                }))
            };
            move || drop(poll)
        });
    }
    // Build the widget the first time a track is selected.
    {
        let music = ctx.music.clone();
        let video = status.current.as_ref().map(|t| t.video_id);
        use_effect_with((*api_ready, video), move |(ready, video)| {
            if let (true, Some(video)) = (*ready, *video) {
                if !music.borrow().has_widget() {
                    let weak = Rc::downgrade(&music);
                    // Widget callbacks may fire while the player is borrowed.
                    let on_signal: Rc<dyn Fn(WidgetSignal)> = Rc::new(move |signal: WidgetSignal| {
                        let weak = weak.clone();
                        Timeout::new(0, move || {
                            if let Some(music) = weak.upgrade() {
                                music.borrow_mut().handle_signal(signal);
                            }
                        })
                        .forget();
                    });
                    let (autoplay, volume) = {
                        let p = music.borrow();
                        (p.status().is_playing, p.effective_volume())
                    };
                    match YouTubeWidget::create(video, autoplay, volume, on_signal) {
                        Ok(widget) => music.borrow_mut().attach_widget(Box::new(widget)),
                        Err(e) => cwarn(&format!("video widget: {:?}", e)),
                    }
                }
            }
            || ()
        });
    }
    // Follow the pointer (mouse or first touch) while dragging.
    {
        let drag = drag.clone();
        let dropped_at = dropped_at.clone();
        let position = position.clone();
        let dragging_handle = dragging.clone();
        let store = ctx.store.clone();
        use_effect_with(*dragging, move |active| {
            let listeners = if *active {
                web_sys::window().map(|window| {
                    let on_move = {
                        let drag = drag.clone();
                        let dropped_at = dropped_at.clone();
                        move |e: &Event| {
                            let (Some((x, y)), Some(start)) = (pointer(e), *drag.borrow()) else {
                                return;
                            };
                            // Keep the page from scrolling under a touch drag.
                            if is_touch(e) {
                                e.prevent_default();
                            }
                            let p = start.moved_to(x, y, viewport());
                            *dropped_at.borrow_mut() = Some(p);
                            position.set(p);
                        }
                    };
                    let on_move = Rc::new(on_move);
                    let on_end = Rc::new(move |_: &Event| {
                        drag.borrow_mut().take();
                        if let Some(p) = dropped_at.borrow_mut().take() {
                            p.save(&*store);
                        }
                        dragging_handle.set(false);
                    });
                    let mut out = Vec::new();
                    for kind in ["mousemove", "touchmove"] {
                        let f = on_move.clone();
                        out.push(EventListener::new_with_options(
                            &window,
                            kind,
                            EventListenerOptions::enable_prevent_default(),
                            move |e| f(e),
                        ));
                    }
                    for kind in ["mouseup", "touchend", "touchcancel"] {
                        let f = on_end.clone();
                        out.push(EventListener::new(&window, kind, move |e| f(e)));
                    }
                    out
                })
            } else {
                None
            };
            move || drop(listeners)
        });
    }

    let begin_drag = {
        let drag = drag.clone();
        let dragging = dragging.clone();
        let from = *position;
        Rc::new(move |e: &Event| {
            if on_control(e) {
                return;
            }
            let Some((x, y)) = pointer(e) else {
                return;
            };
            // Touch starts are passive; cancelling them only warns.
            if !is_touch(e) {
                e.prevent_default();
            }
            *drag.borrow_mut() = Some(DockDrag::begin(x, y, from));
            dragging.set(true);
        })
    };
    let on_grab = {
        let begin_drag = begin_drag.clone();
        Callback::from(move |e: MouseEvent| begin_drag(&e))
    };
    let on_touch_grab = Callback::from(move |e: TouchEvent| begin_drag(&e));

    let music = ctx.music.clone();
    let sound = ctx.sound.clone();
    let cmd = move |f: fn(&mut crate::state::MusicPlayer)| {
        let music = music.clone();
        let sound = sound.clone();
        Callback::from(move |_: MouseEvent| {
            sound.play(Cue::Click);
            f(&mut music.borrow_mut())
        })
    };
    let on_volume = {
        let music = ctx.music.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            if let Ok(v) = input.value().parse::<i32>() {
                music.borrow_mut().set_volume(v);
            }
        })
    };
    let toggle_expanded = {
        let expanded = expanded.clone();
        Callback::from(move |_: MouseEvent| expanded.set(!*expanded))
    };

    let favorites = ctx.favorites.borrow();
    let playlist = if *expanded {
        let current_id = status.current.as_ref().map(|t| t.id);
        let rows = ctx
            .music
            .borrow()
            .playlist()
            .iter()
            .enumerate()
            .map(|(i, track)| {
                let play = {
                    let music = ctx.music.clone();
                    Callback::from(move |_: MouseEvent| music.borrow_mut().play_track(i))
                };
                let fav = {
                    let favorites = ctx.favorites.clone();
                    let id = track.id;
                    Callback::from(move |e: MouseEvent| {
                        e.stop_propagation();
                        favorites.borrow_mut().toggle_track(id);
                    })
                };
                let is_current = current_id == Some(track.id);
                let is_fav = favorites.is_track_favorite(track.id);
                html! {
                    <div
                        key={track.id}
                        onclick={play}
                        style={format!("display:flex; align-items:center; gap:8px; padding:6px; cursor:pointer; border-left:3px solid {};", if is_current { "#00ffff" } else { "transparent" })}
                    >
                        <img src={track.thumbnail()} alt="" style="width:48px; height:27px; object-fit:cover;" />
                        <div style="flex:1; min-width:0;">
                            <div style="font-size:12px;">{ track.title }</div>
                            <div style="font-size:10px; opacity:0.6;">{ track.artist }</div>
                        </div>
                        <button onclick={fav} style="background:none; border:none; cursor:pointer;">
                            { if is_fav { "★" } else { "☆" } }
                        </button>
                    </div>
                }
            })
            .collect::<Html>();
        html! {
            <div style="border-top:1px solid #30363d; margin-top:8px; padding-top:8px;">
                <div style="display:flex; justify-content:space-between; font-size:10px; opacity:0.7; margin-bottom:4px;">
                    <span>{ ctx.t("music.playlist") }</span>
                    <span style="color:#ffd54f;">{ format!("★ {}", favorites.track_count()) }</span>
                </div>
                { rows }
            </div>
        }
    } else {
        html! {}
    };

    let now_playing = match &status.current {
        Some(track) => html! {
            <div style="flex:1; min-width:0;">
                <div style="font-size:10px; opacity:0.7;">{ ctx.t("music.nowPlaying") }</div>
                <div style="font-size:12px; white-space:nowrap; overflow:hidden; text-overflow:ellipsis;">{ format!("{} · {}", track.title, track.artist) }</div>
            </div>
        },
        None => html! {
            <div style="flex:1; font-size:12px;">{ ctx.t("music.title") }</div>
        },
    };

    let p = *position;
    let shown_volume = if status.muted { 0 } else { status.volume };
    html! {
        <div style={format!("position:fixed; z-index:150; bottom:calc(5rem + {}px); right:calc(1rem + {}px); width:{}; background:rgba(13,17,23,0.95); border:2px solid #00ffff; border-radius:8px; padding:10px; user-select:none;", -p.y, -p.x, if *expanded { "24rem" } else { "18rem" })}>
            <div onmousedown={on_grab} ontouchstart={on_touch_grab} style={format!("display:flex; align-items:center; gap:8px; cursor:{};", if *dragging { "grabbing" } else { "grab" })}>
                <span>{ "🎵" }</span>
                { now_playing }
                <button onclick={toggle_expanded}>{ if *expanded { "▾" } else { "▴" } }</button>
            </div>
            <div style="display:flex; align-items:center; gap:6px; margin-top:8px;">
                <button onclick={cmd(|m| m.prev_track())}>{ "⏮" }</button>
                <button onclick={cmd(|m| m.toggle_play())}>{ if status.is_playing { "⏸" } else { "▶" } }</button>
                <button onclick={cmd(|m| m.next_track())}>{ "⏭" }</button>
                <button onclick={cmd(|m| m.toggle_mute())}>{ if status.muted { "🔇" } else { "🔊" } }</button>
                <input
                    type="range"
                    min="0"
                    max="100"
                    value={shown_volume.to_string()}
                    oninput={on_volume}
                    style="flex:1;"
                />
                <button onclick={cmd(|m| m.close())}>{ "✕" }</button>
            </div>
            { playlist }
        </div>
    }
}
