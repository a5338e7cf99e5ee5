//! Hidden `YT.Player` iframe used as the music player's audio output.
//!
//! The iframe API is reached through `js_sys::Reflect`; calls made before the
//! player reports ready are logged and dropped.

use js_sys::{Array, Function, Object, Reflect};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Document;

use crate::state::music::{VideoWidget, WidgetSignal};
use crate::util::cwarn;

const API_SRC: &str = "https://www.youtube.com/iframe_api";
const CONTAINER_ID: &str = "youtube-audio-player";
const INNER_ID: &str = "yt-inner-player";
const HIDDEN_STYLE: &str = "position:fixed;top:-9999px;left:-9999px;width:1px;height:1px;overflow:hidden;";
const STATE_ENDED: f64 = 0.0;

fn player_constructor() -> Option<Function> {
    let window = web_sys::window()?;
    let yt = Reflect::get(&window, &"YT".into()).ok()?;
    if yt.is_undefined() || yt.is_null() {
        return None;
    }
    Reflect::get(&yt, &"Player".into())
        .ok()?
        .dyn_into::<Function>()
        .ok()
}

pub fn api_ready() -> bool {
    player_constructor().is_some()
}

/// Adds the iframe API `<script>` unless one is already present.
pub fn ensure_api_script() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let present = document
        .query_selector("script[src*=\"youtube.com/iframe_api\"]")
        .ok()
        .flatten()
        .is_some();
    if present {
        return;
    }
    let appended = document.create_element("script").and_then(|tag| {
        tag.set_attribute("src", API_SRC)?;
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("no <body>"))?;
        body.append_child(&tag).map(|_| ())
    });
    if let Err(e) = appended {
        cwarn(&format!("iframe api script: {:?}", e));
    }
}

fn ensure_container(document: &Document) -> Result<(), JsValue> {
    if document.get_element_by_id(INNER_ID).is_some() {
        return Ok(());
    }
    let outer = match document.get_element_by_id(CONTAINER_ID) {
        Some(el) => el,
        None => {
            let el = document.create_element("div")?;
            el.set_id(CONTAINER_ID);
            el.set_attribute("style", HIDDEN_STYLE)?;
            document
                .body()
                .ok_or_else(|| JsValue::from_str("no <body>"))?
                .append_child(&el)?;
            el
        }
    };
    let inner = document.create_element("div")?;
    inner.set_id(INNER_ID);
    outer.append_child(&inner)?;
    Ok(())
}

fn set(obj: &Object, key: &str, value: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), value);
}

fn call(target: &JsValue, method: &str, args: &[JsValue]) {
    let result = Reflect::get(target, &JsValue::from_str(method))
        .and_then(|f| f.dyn_into::<Function>())
        .and_then(|f| f.apply(target, &args.iter().collect::<Array>()));
    if let Err(e) = result {
        cwarn(&format!("video widget {}: {:?}", method, e));
    }
}

fn event_data(event: &JsValue) -> Option<f64> {
    Reflect::get(event, &"data".into()).ok()?.as_f64()
}

pub struct YouTubeWidget {
    player: JsValue,
    _on_ready: Closure<dyn FnMut(JsValue)>,
    _on_state: Closure<dyn FnMut(JsValue)>,
    _on_error: Closure<dyn FnMut(JsValue)>,
}

impl YouTubeWidget {
    /// Builds the player for `video_id`. Fails when the API has not loaded.
    pub fn create(
        video_id: &str,
        autoplay: bool,
        volume: u8,
        on_signal: Rc<dyn Fn(WidgetSignal)>,
    ) -> Result<Self, JsValue> {
        let ctor = player_constructor().ok_or_else(|| JsValue::from_str("YT.Player not loaded"))?;
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        ensure_container(&document)?;

        let on_ready: Closure<dyn FnMut(JsValue)> = Closure::new(move |event: JsValue| {
            let Ok(target) = Reflect::get(&event, &"target".into()) else {
                return;
            };
            call(&target, "setVolume", &[JsValue::from(volume)]);
            if autoplay {
                call(&target, "playVideo", &[]);
            }
        });
        let ended = on_signal.clone();
        let on_state: Closure<dyn FnMut(JsValue)> = Closure::new(move |event: JsValue| {
            if event_data(&event) == Some(STATE_ENDED) {
                ended(WidgetSignal::Ended);
            }
        });
        let on_error: Closure<dyn FnMut(JsValue)> = Closure::new(move |event: JsValue| {
            let code = event_data(&event).map(|c| c as i32).unwrap_or(-1);
            on_signal(WidgetSignal::Error(code));
        });

        let vars = Object::new();
        set(&vars, "autoplay", &JsValue::from(u8::from(autoplay)));
        set(&vars, "controls", &JsValue::from(0));
        set(&vars, "disablekb", &JsValue::from(1));
        set(&vars, "fs", &JsValue::from(0));
        set(&vars, "modestbranding", &JsValue::from(1));
        set(&vars, "rel", &JsValue::from(0));

        let events = Object::new();
        set(&events, "onReady", on_ready.as_ref());
        set(&events, "onStateChange", on_state.as_ref());
        set(&events, "onError", on_error.as_ref());

        let options = Object::new();
        set(&options, "height", &"1".into());
        set(&options, "width", &"1".into());
        set(&options, "videoId", &video_id.into());
        set(&options, "playerVars", &vars);
        set(&options, "events", &events);

        let args = Array::of2(&INNER_ID.into(), &options);
        let player = Reflect::construct(&ctor, &args)?;
        Ok(Self {
            player,
            _on_ready: on_ready,
            _on_state: on_state,
            _on_error: on_error,
        })
    }
}

impl VideoWidget for YouTubeWidget {
    fn load(&mut self, video_id: &str, autoplay: bool) {
        if autoplay {
            call(&self.player, "loadVideoById", &[video_id.into()]);
        } else {
            call(&self.player, "cueVideoById", &[video_id.into()]);
        }
    }

    fn play(&mut self) {
        call(&self.player, "playVideo", &[]);
    }

    fn pause(&mut self) {
        call(&self.player, "pauseVideo", &[]);
    }

    fn stop(&mut self) {
        call(&self.player, "stopVideo", &[]);
    }

    fn set_volume(&mut self, volume: u8) {
        call(&self.player, "setVolume", &[JsValue::from(volume)]);
    }
}
