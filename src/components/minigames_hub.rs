use yew::prelude::*;

use super::clicker_view::ClickerView;
use super::hooks::{use_bus_value, use_window_keys};
use super::pong_view::PongView;
use super::snake_view::SnakeView;
use crate::context::AppContext;
use crate::model::MiniGame;
use crate::sound::Cue;

#[derive(Properties, PartialEq, Clone)]
pub struct MiniGamesHubProps {
    pub ctx: AppContext,
    pub on_close: Callback<()>,
}

#[function_component]
pub fn MiniGamesHub(props: &MiniGamesHubProps) -> Html {
    let ctx = props.ctx.clone();
    let active = use_state(|| None::<MiniGame>);
    // Subscribed only to re-render; queries below go to the store.
    {
        let (bus, initial) = {
            let f = ctx.favorites.borrow();
            (f.changes(), f.snapshot().clone())
        };
        use_bus_value(bus, initial);
    }
    {
        let ctx = ctx.clone();
        use_effect_with((), move |_| {
            ctx.play(Cue::MenuOpen);
            || ()
        });
    }

    {
        let on_close = props.on_close.clone();
        let in_game = active.is_some();
        use_window_keys("keydown", move |e| {
            // Open games handle their own Escape.
            if !in_game && e.key() == "Escape" {
                on_close.emit(());
                return true;
            }
            false
        });
    }

    let close_game = {
        let active = active.clone();
        Callback::from(move |_| active.set(None))
    };
    match *active {
        Some(MiniGame::Snake) => return html! { <SnakeView ctx={ctx} on_exit={close_game} /> },
        Some(MiniGame::Pong) => return html! { <PongView ctx={ctx} on_exit={close_game} /> },
        Some(MiniGame::Clicker) => return html! { <ClickerView ctx={ctx} on_exit={close_game} /> },
        None => {}
    }

    // Favorites first, catalog order otherwise.
    let favorites = ctx.favorites.borrow();
    let mut games = MiniGame::ALL.to_vec();
    games.sort_by_key(|g| !favorites.is_game_favorite(g.catalog_id()));

    let rows = games
        .into_iter()
        .map(|game| {
            let open = {
                let active = active.clone();
                let ctx = ctx.clone();
                Callback::from(move |_| {
                    ctx.play(Cue::Click);
                    active.set(Some(game));
                })
            };
            let toggle_favorite = {
                let favorites = ctx.favorites.clone();
                Callback::from(move |e: MouseEvent| {
                    e.stop_propagation();
                    favorites.borrow_mut().toggle_game(game.catalog_id());
                })
            };
            let is_favorite = favorites.is_game_favorite(game.catalog_id());
            html! {
                <div
                    key={game.catalog_id()}
                    onclick={open}
                    style="display:flex; align-items:center; gap:16px; padding:14px; border:2px solid #30363d; border-radius:4px; cursor:pointer; background:rgba(255,255,255,0.03);"
                >
                    <span style="font-size:28px;">{ game.icon() }</span>
                    <div style="flex:1;">
                        <div style="font-weight:bold;">{ ctx.t(game.label_key()) }</div>
                        <div style="font-size:12px; opacity:0.7;">{ ctx.t(game.tagline_key()) }</div>
                    </div>
                    <button
                        onclick={toggle_favorite}
                        title={ctx.t("hub.favorite")}
                        style={format!("background:none; border:none; font-size:18px; cursor:pointer; opacity:{};", if is_favorite { "1" } else { "0.35" })}
                    >
                        { if is_favorite { "★" } else { "☆" } }
                    </button>
                    <span style="color:#00ffff;">{ "▶" }</span>
                </div>
            }
        })
        .collect::<Html>();

    let close = {
        let cb = props.on_close.clone();
        Callback::from(move |_| cb.emit(()))
    };

    html! {
        <div style="max-width:440px; margin:0 auto; display:flex; flex-direction:column; gap:16px;">
            <div style="display:flex; justify-content:space-between; align-items:center;">
                <h2 style="margin:0;">{ format!("🎮 {}", ctx.t("nav.minigames")) }</h2>
                <span title={ctx.t("hub.favorite")} style="color:#ffd54f; font-size:12px;">
                    { format!("★ {}", favorites.game_count()) }
                </span>
                <button onclick={close}>{ "✕" }</button>
            </div>
            <div style="display:flex; flex-direction:column; gap:10px;">{ rows }</div>
            <p style="font-size:12px; opacity:0.7; text-align:center; border-top:1px solid #30363d; padding-top:12px; margin:0;">
                { ctx.t("hub.secretHint") }
            </p>
        </div>
    }
}
