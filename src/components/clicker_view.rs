use gloo::timers::callback::Timeout;
use yew::prelude::*;

use super::hooks::use_window_keys;
use crate::context::AppContext;
use crate::events::AppEvent;
use crate::game_loop::TickLoop;
use crate::model::clicker::{
    Achievement, ClickerAction, ClickerState, ExpiryTimers, FLOATING_NUMBER_MS, FloatingAction,
    FloatingFeed, PASSIVE_TICK_MS, Upgrade,
};
use crate::sound::Cue;
use crate::util::clog;

#[derive(Properties, PartialEq, Clone)]
pub struct ClickerViewProps {
    pub ctx: AppContext,
    pub on_exit: Callback<()>,
}

#[function_component]
pub fn ClickerView(props: &ClickerViewProps) -> Html {
    let ctx = props.ctx.clone();
    let state = {
        let store = ctx.store.clone();
        use_reducer(move || ClickerState::load(&*store))
    };
    let floating = use_reducer(FloatingFeed::default);
    // Mirrors FloatingFeed id assignment so expiry can be scheduled at click time.
    let next_float_id = use_mut_ref(|| 0u64);
    // Dropped with the view, which cancels any pending expiry.
    let float_timers = use_mut_ref(ExpiryTimers::<Timeout>::default);
    let latest = use_mut_ref(ClickerState::default);
    *latest.borrow_mut() = (*state).clone();

    let passive = use_mut_ref(|| None::<TickLoop>);
    {
        let passive = passive.clone();
        let dispatcher = state.dispatcher();
        let latest = latest.clone();
        let store = ctx.store.clone();
        use_effect_with((), move |_| {
            *passive.borrow_mut() = Some(TickLoop::new(PASSIVE_TICK_MS, move || {
                dispatcher.dispatch(ClickerAction::PassiveTick)
            }));
            move || {
                if let Some(mut lp) = passive.borrow_mut().take() {
                    lp.stop();
                }
                latest.borrow().save(&*store);
            }
        });
    }
    {
        let passive = passive.clone();
        use_effect_with(state.auto_yield_rate > 0, move |active| {
            if let Some(lp) = passive.borrow_mut().as_mut() {
                if *active {
                    lp.start();
                } else {
                    lp.pause();
                }
            }
            || ()
        });
    }
    // Persist and announce after every accepted change.
    {
        let ctx = ctx.clone();
        let state = state.clone();
        use_effect_with(state.version, move |version| {
            if *version > 0 {
                state.save(&*ctx.store);
                if !state.last_unlocked.is_empty() {
                    ctx.play(Cue::Secret);
                }
                for a in &state.last_unlocked {
                    clog(&format!("achievement unlocked: {:?}", a));
                    ctx.events.publish(&AppEvent::AchievementUnlocked(*a));
                }
            }
            || ()
        });
    }

    {
        let on_exit = props.on_exit.clone();
        use_window_keys("keydown", move |e| {
            if e.key() == "Escape" {
                on_exit.emit(());
                return true;
            }
            false
        });
    }

    let on_click = {
        let dispatcher = state.dispatcher();
        let live = floating.items.clone();
        let floating = floating.dispatcher();
        let next_float_id = next_float_id.clone();
        let float_timers = float_timers.clone();
        let power = state.click_power;
        let ctx = ctx.clone();
        Callback::from(move |e: MouseEvent| {
            ctx.play(Cue::Click);
            dispatcher.dispatch(ClickerAction::Click);
            let id = {
                let mut next = next_float_id.borrow_mut();
                let id = *next;
                *next += 1;
                id
            };
            floating.dispatch(FloatingAction::Push {
                value: power,
                x: e.offset_x() as f64,
                y: e.offset_y() as f64,
            });
            let floating = floating.clone();
            let timer = Timeout::new(FLOATING_NUMBER_MS, move || {
                floating.dispatch(FloatingAction::Expire(id))
            });
            float_timers.borrow_mut().track(id, timer, &live);
        })
    };
    let buy = |upgrade: Upgrade| {
        let dispatcher = state.dispatcher();
        let ctx = ctx.clone();
        Callback::from(move |_: MouseEvent| {
            ctx.play(Cue::Click);
            dispatcher.dispatch(ClickerAction::Buy(upgrade))
        })
    };
    let exit = {
        let cb = props.on_exit.clone();
        Callback::from(move |_| cb.emit(()))
    };

    let upgrade_row = |upgrade: Upgrade, label: String, hint: &str, color: &str| {
        let cost = upgrade.cost(&state);
        let affordable = state.can_afford(upgrade);
        let border = if affordable { color } else { "#30363d" };
        let opacity = if affordable { "1" } else { "0.5" };
        html! {
            <button
                onclick={buy(upgrade)}
                disabled={!affordable}
                style={format!("display:flex; justify-content:space-between; width:100%; padding:8px 12px; border:2px solid {}; opacity:{}; background:transparent; color:inherit;", border, opacity)}
            >
                <span>{ format!("{} {}", label, hint) }</span>
                <span style="color:#ffd54f;">{ format!("{} ⭐", cost) }</span>
            </button>
        }
    };

    let floats = floating
        .items
        .iter()
        .map(|n| {
            html! {
                <span
                    key={n.id}
                    style={format!("position:absolute; left:{}px; top:{}px; color:#ffd54f; font-weight:bold; pointer-events:none; animation:float-up 1s ease-out forwards;", n.x, n.y)}
                >
                    { format!("+{}", n.value) }
                </span>
            }
        })
        .collect::<Html>();

    let badges = Achievement::ALL
        .into_iter()
        .map(|a| {
            let unlocked = state.achievements.contains(&a);
            let style = if unlocked {
                "width:32px; height:32px; display:flex; align-items:center; justify-content:center; border:1px solid #ffd54f; background:rgba(255,213,79,0.2);"
            } else {
                "width:32px; height:32px; display:flex; align-items:center; justify-content:center; border:1px solid #30363d; opacity:0.6;"
            };
            html! {
                <div {style} title={ctx.t(a.label_key())}>
                    { if unlocked { a.icon() } else { "?" } }
                </div>
            }
        })
        .collect::<Html>();

    html! {
        <div style="display:flex; flex-direction:column; align-items:stretch; gap:12px; max-width:320px; margin:0 auto;">
            <h2 style="margin:0; color:#ffd54f; text-align:center;">{ format!("⭐ {}", ctx.t("games.clicker")) }</h2>
            <div style="display:grid; grid-template-columns:repeat(3, 1fr); gap:8px; text-align:center;">
                <div>
                    <div style="font-size:10px; opacity:0.7;">{ ctx.t("clicker.points") }</div>
                    <div style="color:#00ffff;">{ state.points }</div>
                </div>
                <div>
                    <div style="font-size:10px; opacity:0.7;">{ ctx.t("clicker.power") }</div>
                    <div style="color:#ff33cc;">{ format!("x{}", state.click_power) }</div>
                </div>
                <div>
                    <div style="font-size:10px; opacity:0.7;">{ ctx.t("clicker.auto") }</div>
                    <div style="color:#ffd54f;">{ format!("{}/s", state.auto_yield_rate) }</div>
                </div>
            </div>
            <div style="display:flex; justify-content:center;">
                <button
                    onclick={on_click}
                    style="position:relative; width:128px; height:128px; border-radius:50%; border:4px solid #ffd54f; background:linear-gradient(135deg, #ff33cc, #8a2be2, #00ffff); font-size:56px; cursor:pointer;"
                >
                    { "⭐" }
                    { floats }
                </button>
            </div>
            { upgrade_row(Upgrade::Power, ctx.t("clicker.morePower"), "(+1)", "#ff33cc") }
            { upgrade_row(Upgrade::Auto, ctx.t("clicker.autoClick"), "(+1/s)", "#00ffff") }
            <div style="border-top:1px solid #30363d; padding-top:8px;">
                <div style="font-size:10px; opacity:0.7; margin-bottom:6px;">
                    { format!("🏆 {}: {}/{}", ctx.t("clicker.achievements"), state.achievements.len(), Achievement::ALL.len()) }
                </div>
                <div style="display:flex; gap:4px;">{ badges }</div>
            </div>
            <button onclick={exit}>{ "◄ ESC" }</button>
        </div>
    }
}
