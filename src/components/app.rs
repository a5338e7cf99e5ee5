use gloo::timers::callback::Timeout;
use yew::prelude::*;

use super::achievement_toast::AchievementToast;
use super::custom_cursor::CustomCursor;
use super::hooks::{use_bus_value, use_window_keys};
use super::minigames_hub::MiniGamesHub;
use super::music_dock::MusicDock;
use super::settings_menu::SettingsMenu;
use crate::context::AppContext;
use crate::events::AppEvent;
use crate::secret_code::{REVEAL_MS, SecretCodeDetector};
use crate::sound::Cue;
use crate::storage::open_store;
use crate::util::clog;

#[derive(PartialEq, Clone, Copy)]
enum View {
    Home,
    MiniGames,
    Settings,
}

#[function_component(App)]
pub fn app() -> Html {
    let ctx = (*use_memo((), |_| AppContext::new(open_store()))).clone();
    let view = use_state(|| View::Home);
    let prefs = {
        let (bus, initial) = {
            let p = ctx.preferences.borrow();
            (p.changes(), p.snapshot().clone())
        };
        use_bus_value(bus, initial)
    };
    let secret_shown = use_state(|| false);

    // App-wide notifications that are not toasts.
    {
        let secret_shown = secret_shown.clone();
        let sound = ctx.sound.clone();
        use_effect_with(ctx.events.clone(), move |bus| {
            let sub = bus.subscribe(move |e: &AppEvent| match e {
                AppEvent::SecretDiscovered => {
                    sound.play(Cue::Secret);
                    secret_shown.set(true);
                }
                AppEvent::GameOver { game, score } => {
                    clog(&format!("{:?} round over, score {}", game, score))
                }
                _ => {}
            });
            move || drop(sub)
        });
    }
    {
        let secret_shown = secret_shown.clone();
        use_effect_with(*secret_shown, move |shown| {
            let timer = shown.then(|| Timeout::new(REVEAL_MS, move || secret_shown.set(false)));
            move || drop(timer)
        });
    }
    {
        let detector = use_mut_ref(SecretCodeDetector::new);
        let events = ctx.events.clone();
        use_window_keys("keydown", move |e| {
            if detector.borrow_mut().feed(&e.key()) {
                events.publish(&AppEvent::SecretDiscovered);
            }
            false
        });
    }

    let go = |target: View| {
        let view = view.clone();
        Callback::from(move |_: MouseEvent| view.set(target))
    };
    let back_home = {
        let view = view.clone();
        Callback::from(move |_: ()| view.set(View::Home))
    };
    let close_secret = {
        let secret_shown = secret_shown.clone();
        Callback::from(move |_: MouseEvent| secret_shown.set(false))
    };

    let content = match *view {
        View::Home => html! {
            <div style="text-align:center; display:flex; flex-direction:column; gap:16px; align-items:center; padding-top:48px;">
                <h1 style="margin:0; color:hsl(var(--neon-cyan));">{ "🦇 LA CUEVA 🦇" }</h1>
                <button onclick={go(View::MiniGames)} style="padding:12px 24px;">{ format!("🎮 {}", ctx.t("nav.minigames")) }</button>
                <button onclick={go(View::Settings)} style="padding:12px 24px;">{ format!("⚙️ {}", ctx.t("nav.settings")) }</button>
            </div>
        },
        View::MiniGames => html! { <MiniGamesHub ctx={ctx.clone()} on_close={back_home.clone()} /> },
        View::Settings => html! { <SettingsMenu ctx={ctx.clone()} on_close={back_home.clone()} /> },
    };

    let secret = if *secret_shown {
        html! {
            <div
                onclick={close_secret}
                style="position:fixed; inset:0; z-index:99999; display:flex; flex-direction:column; align-items:center; justify-content:center; gap:12px; background:rgba(0,0,0,0.85);"
            >
                <h2 style="margin:0; color:hsl(var(--neon-pink));">{ ctx.t("secret.found") }</h2>
                <p style="margin:0; color:hsl(var(--star-gold));">{ ctx.t("secret.title") }</p>
                <button>{ ctx.t("common.close") }</button>
            </div>
        }
    } else {
        html! {}
    };

    let cursor = if prefs.custom_cursor_enabled {
        html! {
            <>
                <style>{ "* { cursor: none !important; }" }</style>
                <CustomCursor />
            </>
        }
    } else {
        html! {}
    };
    html! {
        <div lang={prefs.language.code()} style="min-height:100vh; background:#0d1117; color:#e6edf3; font-family:monospace;">
            <nav style="display:flex; gap:8px; padding:12px 16px; border-bottom:1px solid #30363d;">
                <button onclick={go(View::Home)}>{ "🏠" }</button>
                <button onclick={go(View::MiniGames)}>{ ctx.t("nav.minigames") }</button>
                <button onclick={go(View::Settings)}>{ ctx.t("nav.settings") }</button>
            </nav>
            <main style="padding:16px;">{ content }</main>
            <MusicDock ctx={ctx.clone()} />
            <AchievementToast ctx={ctx.clone()} />
            { secret }
            { cursor }
        </div>
    }
}
