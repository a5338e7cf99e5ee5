use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use yew::prelude::*;

use super::hooks::use_window_keys;
use crate::context::AppContext;
use crate::events::AppEvent;
use crate::game_loop::FrameLoop;
use crate::model::{BestScore, MiniGame};
use crate::model::pong::{self, FrameOutcome, PongConfig, PongState, Side};
use crate::rng::JsRandom;
use crate::sound::Cue;
use crate::storage::keys;

const COURT_BG: &str = "#0d1117";
const NET: &str = "rgba(255,255,255,0.15)";
const PLAYER_COLOR: &str = "#00ffff";
const AI_COLOR: &str = "#ff33cc";
const BALL_COLOR: &str = "#ffd54f";

/// What the DOM around the canvas needs; the canvas itself is redrawn
/// every frame without going through Yew.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Hud {
    player: u32,
    ai: u32,
    high: u32,
    paused: bool,
    winner: Option<Side>,
}

impl Hud {
    fn of(g: &PongState) -> Self {
        Self {
            player: g.player_score,
            ai: g.ai_score,
            high: g.high_score,
            paused: g.is_paused,
            winner: g.winner(),
        }
    }
}

fn draw(canvas: &HtmlCanvasElement, g: &PongState) {
    let Some(ctx) = canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
    else {
        return;
    };
    let c = &g.config;
    ctx.set_fill_style_str(COURT_BG);
    ctx.fill_rect(0.0, 0.0, c.court_width, c.court_height);

    ctx.set_fill_style_str(NET);
    let mut y = 0.0;
    while y < c.court_height {
        ctx.fill_rect(c.court_width / 2.0 - 1.0, y, 2.0, 10.0);
        y += 20.0;
    }

    ctx.set_fill_style_str(PLAYER_COLOR);
    ctx.fill_rect(c.paddle_inset, g.player_y, c.paddle_width, c.paddle_height);
    ctx.set_fill_style_str(AI_COLOR);
    ctx.fill_rect(
        c.court_width - c.paddle_inset - c.paddle_width,
        g.ai_y,
        c.paddle_width,
        c.paddle_height,
    );
    ctx.set_fill_style_str(BALL_COLOR);
    ctx.fill_rect(g.ball.x, g.ball.y, c.ball_size, c.ball_size);
}

#[derive(Properties, PartialEq, Clone)]
pub struct PongViewProps {
    pub ctx: AppContext,
    pub on_exit: Callback<()>,
}

#[function_component]
pub fn PongView(props: &PongViewProps) -> Html {
    let ctx = props.ctx.clone();
    let canvas_ref = use_node_ref();
    let best = use_mut_ref({
        let store = ctx.store.clone();
        move || BestScore::load(&*store, keys::PONG_HIGH_SCORE)
    });
    let game = {
        let high = best.borrow().saved();
        use_mut_ref(move || PongState::new(PongConfig::default(), high, &mut JsRandom))
    };
    let hud = {
        let initial = Hud::of(&game.borrow());
        use_state_eq(move || initial)
    };

    let frame_loop = use_mut_ref(|| None::<FrameLoop>);
    {
        let frame_loop = frame_loop.clone();
        let game = game.clone();
        let canvas_ref = canvas_ref.clone();
        let hud = hud.clone();
        let ctx = ctx.clone();
        let best = best.clone();
        use_effect_with((), move |_| {
            let on_frame = {
                let game = game.clone();
                let best = best.clone();
                let ctx = ctx.clone();
                move |_ts: f64| {
                    let (outcome, snapshot, over, score) = {
                        let mut g = game.borrow_mut();
                        let outcome = g.frame(&mut JsRandom);
                        if let Some(canvas) = canvas_ref.cast::<HtmlCanvasElement>() {
                            draw(&canvas, &g);
                        }
                        pong::record_point(&mut best.borrow_mut(), &*ctx.store, &g, outcome);
                        (outcome, Hud::of(&g), g.is_game_over, g.player_score)
                    };
                    match outcome {
                        FrameOutcome::Point(_) => {}
                        FrameOutcome::PaddleHit(Side::Player) => return ctx.play(Cue::Hover),
                        _ => return,
                    }
                    hud.set(snapshot);
                    if over {
                        if best.borrow().is_round_record(score) {
                            ctx.play(Cue::Success);
                            ctx.events.publish(&AppEvent::NewHighScore {
                                game: MiniGame::Pong,
                                score,
                            });
                        }
                        ctx.events.publish(&AppEvent::GameOver {
                            game: MiniGame::Pong,
                            score,
                        });
                    }
                }
            };
            let mut lp = FrameLoop::new(on_frame);
            lp.start();
            *frame_loop.borrow_mut() = Some(lp);
            move || {
                frame_loop.borrow_mut().take();
                let high = game.borrow().high_score;
                best.borrow_mut().record(&*ctx.store, high);
            }
        });
    }
    {
        let frame_loop = frame_loop.clone();
        let game = game.clone();
        let canvas_ref = canvas_ref.clone();
        let running = !hud.paused && hud.winner.is_none();
        use_effect_with(running, move |running| {
            if let Some(lp) = frame_loop.borrow_mut().as_mut() {
                if *running {
                    lp.resume();
                } else {
                    lp.pause();
                    // Leave the final position on screen.
                    if let Some(canvas) = canvas_ref.cast::<HtmlCanvasElement>() {
                        draw(&canvas, &game.borrow());
                    }
                }
            }
            || ()
        });
    }

    let restart = {
        let game = game.clone();
        let hud = hud.clone();
        let best = best.clone();
        let ctx = ctx.clone();
        Callback::from(move |_: ()| {
            ctx.play(Cue::Click);
            best.borrow_mut().begin_round();
            let mut g = game.borrow_mut();
            g.restart(&mut JsRandom);
            hud.set(Hud::of(&g));
        })
    };

    {
        let game = game.clone();
        let hud = hud.clone();
        let restart = restart.clone();
        let on_exit = props.on_exit.clone();
        use_window_keys("keydown", move |e| {
            let key = e.key();
            if game.borrow_mut().input.apply_key(&key, true) {
                return true;
            }
            let over = game.borrow().is_game_over;
            match key.as_str() {
                " " | "Enter" if over => restart.emit(()),
                " " => {
                    let mut g = game.borrow_mut();
                    g.toggle_pause();
                    hud.set(Hud::of(&g));
                }
                "Escape" => on_exit.emit(()),
                _ => return false,
            }
            true
        });
    }
    {
        let game = game.clone();
        use_window_keys("keyup", move |e| game.borrow_mut().input.apply_key(&e.key(), false));
    }

    let exit = {
        let cb = props.on_exit.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let restart_click = {
        let restart = restart.clone();
        Callback::from(move |_: MouseEvent| restart.emit(()))
    };

    let config = game.borrow().config;
    let overlay = match hud.winner {
        Some(side) => {
            let (title, color) = match side {
                Side::Player => (ctx.t("game.youWin"), PLAYER_COLOR),
                Side::Ai => (ctx.t("game.youLose"), AI_COLOR),
            };
            html! {
                <div style="position:absolute; inset:0; display:flex; flex-direction:column; align-items:center; justify-content:center; gap:10px; background:rgba(0,0,0,0.75);">
                    <h3 style={format!("margin:0; color:{};", color)}>{ title }</h3>
                    <p style="margin:0;">{ format!("{} - {}", hud.player, hud.ai) }</p>
                    <button onclick={restart_click}>{ ctx.t("game.restart") }</button>
                </div>
            }
        }
        None if hud.paused => html! {
            <div style="position:absolute; inset:0; display:flex; align-items:center; justify-content:center; background:rgba(0,0,0,0.55);">
                <h3 style="margin:0; color:#ffd54f;">{ ctx.t("game.paused") }</h3>
            </div>
        },
        None => html! {},
    };

    html! {
        <div style="display:flex; flex-direction:column; align-items:center; gap:12px;">
            <div style="display:flex; justify-content:space-between; width:100%; max-width:400px; font-size:14px;">
                <span style={format!("color:{};", PLAYER_COLOR)}>{ hud.player }</span>
                <span style="color:#ffd54f;">{ format!("{}: {}", ctx.t("game.best"), hud.high) }</span>
                <span style={format!("color:{};", AI_COLOR)}>{ hud.ai }</span>
            </div>
            <div style="position:relative;">
                <canvas
                    ref={canvas_ref}
                    width={config.court_width.to_string()}
                    height={config.court_height.to_string()}
                    style="display:block; border:2px solid #00ffff;"
                />
                { overlay }
            </div>
            <div style="font-size:11px; opacity:0.7;">{ ctx.t("pong.controls") }</div>
            <button onclick={exit}>{ "◄ ESC" }</button>
        </div>
    }
}
