use yew::prelude::*;

use super::hooks::use_window_keys;
use crate::context::AppContext;
use crate::events::AppEvent;
use crate::game_loop::TickLoop;
use crate::model::snake::{Cell, Direction, SnakeAction, SnakeState, TickOutcome};
use crate::model::{BestScore, MiniGame};
use crate::sound::Cue;
use crate::storage::keys;
use crate::util::pad_score;

const CELL_PX: i32 = 20;

#[derive(Properties, PartialEq, Clone)]
pub struct SnakeViewProps {
    pub ctx: AppContext,
    pub on_exit: Callback<()>,
}

#[function_component]
pub fn SnakeView(props: &SnakeViewProps) -> Html {
    let ctx = props.ctx.clone();
    let best = use_mut_ref({
        let store = ctx.store.clone();
        move || BestScore::load(&*store, keys::SNAKE_HIGH_SCORE)
    });
    let state = {
        let saved = best.borrow().saved();
        use_reducer(move || SnakeState::new(saved))
    };

    // Loop lives for the whole view; pause and speed are synced below.
    let tick_loop = use_mut_ref(|| None::<TickLoop>);
    {
        let tick_loop = tick_loop.clone();
        let dispatcher = state.dispatcher();
        let period = state.tick_interval_ms();
        use_effect_with((), move |_| {
            let mut lp = TickLoop::new(period, move || dispatcher.dispatch(SnakeAction::Tick));
            lp.start();
            *tick_loop.borrow_mut() = Some(lp);
            move || {
                if let Some(mut lp) = tick_loop.borrow_mut().take() {
                    lp.stop();
                }
            }
        });
    }
    {
        let tick_loop = tick_loop.clone();
        use_effect_with(
            (state.tick_interval_ms(), state.is_running()),
            move |(period, running)| {
                if let Some(lp) = tick_loop.borrow_mut().as_mut() {
                    lp.set_period(*period);
                    if *running {
                        lp.resume();
                    } else {
                        lp.pause();
                    }
                }
                || ()
            },
        );
    }
    // Per tick: a new best is stored as soon as it is eaten; the round end
    // is announced once.
    {
        let ctx = ctx.clone();
        let best = best.clone();
        let outcome = state.last_outcome;
        let score = state.score;
        let high = state.high_score;
        use_effect_with(state.ticks, move |_| {
            if matches!(outcome, TickOutcome::Ate | TickOutcome::BoardFull) {
                best.borrow_mut().record(&*ctx.store, high);
                ctx.play(Cue::Click);
            }
            if outcome.ends_game() {
                if best.borrow().is_round_record(score) {
                    ctx.play(Cue::Success);
                    ctx.events.publish(&AppEvent::NewHighScore {
                        game: MiniGame::Snake,
                        score,
                    });
                }
                ctx.events.publish(&AppEvent::GameOver {
                    game: MiniGame::Snake,
                    score,
                });
            }
            || ()
        });
    }

    let restart = {
        let dispatcher = state.dispatcher();
        let best = best.clone();
        let ctx = ctx.clone();
        Callback::from(move |_: ()| {
            ctx.play(Cue::Click);
            best.borrow_mut().begin_round();
            dispatcher.dispatch(SnakeAction::Restart);
        })
    };
    {
        let dispatcher = state.dispatcher();
        let restart = restart.clone();
        let on_exit = props.on_exit.clone();
        let over = state.is_game_over;
        use_window_keys("keydown", move |e| {
            let key = e.key();
            if let Some(dir) = Direction::from_key(&key) {
                dispatcher.dispatch(SnakeAction::Turn(dir));
                return true;
            }
            match key.as_str() {
                " " | "Enter" if over => restart.emit(()),
                " " => dispatcher.dispatch(SnakeAction::TogglePause),
                "Escape" => on_exit.emit(()),
                _ => return false,
            }
            true
        });
    }

    let restart_click = {
        let restart = restart.clone();
        Callback::from(move |_: MouseEvent| restart.emit(()))
    };
    let exit = {
        let cb = props.on_exit.clone();
        Callback::from(move |_| cb.emit(()))
    };

    let side = state.grid_size * CELL_PX;
    let head = state.head();
    let cells = (0..state.grid_size).flat_map(|y| (0..state.grid_size).map(move |x| Cell { x, y }));
    let grid = cells
        .map(|c| {
            let color = if c == head {
                "hsl(var(--neon-cyan))"
            } else if state.occupies(c) {
                "hsl(var(--neon-cyan) / 0.6)"
            } else if c == state.food {
                "hsl(var(--neon-pink))"
            } else {
                "transparent"
            };
            html! { <div style={format!("background:{}; border-radius:3px;", color)}></div> }
        })
        .collect::<Html>();

    let overlay = if state.is_game_over {
        html! {
            <div style="position:absolute; inset:0; display:flex; flex-direction:column; align-items:center; justify-content:center; gap:10px; background:rgba(0,0,0,0.75);">
                <h3 style="margin:0; color:hsl(var(--neon-pink));">{ ctx.t("game.over") }</h3>
                <p style="margin:0;">{ format!("{}: {}", ctx.t("game.score"), state.score) }</p>
                <button onclick={restart_click}>{ ctx.t("game.restart") }</button>
            </div>
        }
    } else if state.is_paused {
        html! {
            <div style="position:absolute; inset:0; display:flex; align-items:center; justify-content:center; background:rgba(0,0,0,0.55);">
                <h3 style="margin:0; color:hsl(var(--star-gold));">{ ctx.t("game.paused") }</h3>
            </div>
        }
    } else {
        html! {}
    };

    html! {
        <div style="display:flex; flex-direction:column; align-items:center; gap:12px;">
            <div style="display:flex; justify-content:space-between; width:100%; max-width:320px; font-size:14px;">
                <span>{ format!("{}: {}", ctx.t("game.score"), pad_score(state.score as u64, 4)) }</span>
                <span style="color:hsl(var(--star-gold));">{ format!("{}: {}", ctx.t("game.best"), pad_score(state.high_score as u64, 4)) }</span>
            </div>
            <div style={format!("position:relative; width:{side}px; height:{side}px; border:2px solid hsl(var(--neon-cyan)); background:#0d1117;")}>
                <div style={format!("display:grid; grid-template-columns:repeat({n}, 1fr); grid-template-rows:repeat({n}, 1fr); gap:1px; width:100%; height:100%;", n = state.grid_size)}>
                    { grid }
                </div>
                { overlay }
            </div>
            <div style="font-size:11px; opacity:0.7;">{ ctx.t("snake.controls") }</div>
            <button onclick={exit}>{ "◄ ESC" }</button>
        </div>
    }
}
