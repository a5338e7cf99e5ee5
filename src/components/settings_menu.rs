use web_sys::HtmlInputElement;
use yew::prelude::*;

use super::hooks::{use_bus_value, use_window_keys};
use crate::context::AppContext;
use crate::i18n::Language;
use crate::state::preferences::{BackgroundMusic, MAX_BACKGROUND_VOLUME, ThemeId};

const SECTION: &str = "padding:14px; border:2px solid #30363d; border-radius:4px; display:flex; flex-direction:column; gap:10px;";

fn option_style(selected: bool) -> String {
    let border = if selected { "#ffd54f" } else { "#30363d" };
    format!(
        "display:flex; align-items:center; gap:8px; padding:8px; border:2px solid {}; background:transparent; color:inherit; cursor:pointer;",
        border
    )
}

#[derive(Properties, PartialEq, Clone)]
pub struct SettingsMenuProps {
    pub ctx: AppContext,
    pub on_close: Callback<()>,
}

#[function_component]
pub fn SettingsMenu(props: &SettingsMenuProps) -> Html {
    let ctx = props.ctx.clone();
    let prefs = {
        let (bus, initial) = {
            let p = ctx.preferences.borrow();
            (p.changes(), p.snapshot().clone())
        };
        use_bus_value(bus, initial)
    };

    {
        let on_close = props.on_close.clone();
        use_window_keys("keydown", move |e| {
            if e.key() == "Escape" {
                on_close.emit(());
                return true;
            }
            false
        });
    }

    let languages = Language::ALL
        .into_iter()
        .map(|lang| {
            let onclick = {
                let store = ctx.preferences.clone();
                Callback::from(move |_| store.borrow_mut().set_language(lang))
            };
            html! {
                <button key={lang.code()} {onclick} style={option_style(prefs.language == lang)}>
                    { lang.code().to_uppercase() }
                </button>
            }
        })
        .collect::<Html>();

    let themes = ThemeId::ALL
        .into_iter()
        .map(|theme| {
            let onclick = {
                let store = ctx.preferences.clone();
                Callback::from(move |_| store.borrow_mut().set_theme(theme))
            };
            html! {
                <button key={theme.label()} {onclick} style={option_style(prefs.theme == theme)}>
                    <span style={format!("width:20px; height:20px; border-radius:50%; background:{};", theme.swatch())}></span>
                    <span>{ theme.label() }</span>
                </button>
            }
        })
        .collect::<Html>();

    let tracks = BackgroundMusic::ALL
        .into_iter()
        .map(|music| {
            let onclick = {
                let store = ctx.preferences.clone();
                Callback::from(move |_| store.borrow_mut().set_background_music(music))
            };
            html! {
                <button key={music.label()} {onclick} style={option_style(prefs.background_music == music)}>
                    { music.label() }
                </button>
            }
        })
        .collect::<Html>();

    let toggle_playback = {
        let store = ctx.preferences.clone();
        Callback::from(move |_| store.borrow_mut().toggle_playback())
    };
    let on_volume = {
        let store = ctx.preferences.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            if let Ok(percent) = input.value().parse::<f64>() {
                store.borrow_mut().set_volume(percent / 100.0);
            }
        })
    };
    let toggle_cursor = {
        let store = ctx.preferences.clone();
        let enabled = prefs.custom_cursor_enabled;
        Callback::from(move |_| store.borrow_mut().set_custom_cursor(!enabled))
    };
    let close = {
        let cb = props.on_close.clone();
        Callback::from(move |_| cb.emit(()))
    };

    let volume_percent = (prefs.background_music_volume * 100.0).round() as u32;
    let max_percent = (MAX_BACKGROUND_VOLUME * 100.0).round() as u32;
    let music_controls = if prefs.background_music == BackgroundMusic::None {
        html! {}
    } else {
        html! {
            <>
                <button onclick={toggle_playback} style={option_style(prefs.is_background_music_playing)}>
                    { if prefs.is_background_music_playing { "🔊" } else { "🔇" } }
                </button>
                <div style="display:flex; justify-content:space-between; font-size:12px;">
                    <span>{ ctx.t("settings.volume") }</span>
                    <span style="color:#ffd54f;">{ format!("{}%", volume_percent) }</span>
                </div>
                <input
                    type="range"
                    min="0"
                    max={max_percent.to_string()}
                    value={volume_percent.to_string()}
                    oninput={on_volume}
                />
            </>
        }
    };

    html! {
        <div style="max-width:480px; margin:0 auto; display:flex; flex-direction:column; gap:14px;">
            <div style="display:flex; justify-content:space-between; align-items:center;">
                <h2 style="margin:0;">{ ctx.t("settings.title") }</h2>
                <button onclick={close}>{ "✕" }</button>
            </div>
            <div style={SECTION}>
                <h3 style="margin:0; font-size:12px;">{ format!("🌐 {}", ctx.t("settings.language")) }</h3>
                <div style="display:grid; grid-template-columns:repeat(2, 1fr); gap:8px;">{ languages }</div>
            </div>
            <div style={SECTION}>
                <h3 style="margin:0; font-size:12px;">{ format!("🎨 {}", ctx.t("settings.theme")) }</h3>
                <div style="display:grid; grid-template-columns:repeat(2, 1fr); gap:8px;">{ themes }</div>
            </div>
            <div style={SECTION}>
                <h3 style="margin:0; font-size:12px;">{ format!("🎵 {}", ctx.t("settings.bgMusic")) }</h3>
                <div style="font-size:12px; opacity:0.7;">{ ctx.t("settings.musicOff") }</div>
                <div style="display:grid; grid-template-columns:repeat(2, 1fr); gap:8px;">{ tracks }</div>
                { music_controls }
            </div>
            <div style={SECTION}>
                <label style="display:flex; align-items:center; gap:8px; cursor:pointer;">
                    <input type="checkbox" checked={prefs.custom_cursor_enabled} onclick={toggle_cursor} />
                    <span>{ ctx.t("settings.cursor") }</span>
                </label>
                <div style="font-size:12px; opacity:0.7;">{ ctx.t("settings.cursorHint") }</div>
            </div>
            <div style="text-align:center; font-size:12px; opacity:0.7;">{ ctx.t("settings.exit") }</div>
        </div>
    }
}
