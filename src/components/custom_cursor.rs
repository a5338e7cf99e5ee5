//! Pixel-style pointer drawn as a DOM element that follows the mouse.
//! Its glyph changes with what is under the pointer; the native cursor is
//! hidden by the app while this is mounted.

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};
use yew::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorKind {
    Pointer,
    Link,
    Text,
    Help,
    Working,
    Unavailable,
    Like,
    Negative,
    Alternate,
}

impl CursorKind {
    #[cfg(test)]
    pub const ALL: [CursorKind; 9] = [
        CursorKind::Pointer,
        CursorKind::Link,
        CursorKind::Text,
        CursorKind::Help,
        CursorKind::Working,
        CursorKind::Unavailable,
        CursorKind::Like,
        CursorKind::Negative,
        CursorKind::Alternate,
    ];

    /// Value accepted in a `data-cursor` attribute.
    pub fn from_attr(value: &str) -> Option<CursorKind> {
        Some(match value {
            "pointer" => CursorKind::Pointer,
            "link" => CursorKind::Link,
            "text" => CursorKind::Text,
            "help" => CursorKind::Help,
            "working" => CursorKind::Working,
            "unavailable" => CursorKind::Unavailable,
            "like" => CursorKind::Like,
            "negative" => CursorKind::Negative,
            "alternate" => CursorKind::Alternate,
            _ => return None,
        })
    }

    /// Inline SVG image for this kind.
    pub fn glyph(self) -> String {
        const ARROW: &str = "M2 2 L2 22 L8 16 L12 26 L16 24 L12 14 L20 14 Z";
        let body = match self {
            CursorKind::Pointer => format!("<path d='{ARROW}' fill='#00ffff' stroke='#000' stroke-width='1.5'/>"),
            CursorKind::Link => format!(
                "<path d='{ARROW}' fill='#ff33cc' stroke='#000' stroke-width='1.5'/><circle cx='24' cy='24' r='5' fill='#ffd54f' stroke='#000'/>"
            ),
            CursorKind::Text => "<path d='M10 3 H22 M16 3 V29 M10 29 H22' stroke='#00ffff' stroke-width='3' fill='none'/>".to_string(),
            CursorKind::Help => format!(
                "<path d='{ARROW}' fill='#00ffff' stroke='#000' stroke-width='1.5'/><text x='20' y='30' font-size='14' font-family='monospace' font-weight='bold' fill='#ffd54f'>?</text>"
            ),
            CursorKind::Working => format!(
                "<path d='{ARROW}' fill='#00ffff' stroke='#000' stroke-width='1.5'/><circle cx='24' cy='24' r='5' fill='none' stroke='#ffd54f' stroke-width='3' stroke-dasharray='8 4'/>"
            ),
            CursorKind::Unavailable => "<circle cx='16' cy='16' r='11' fill='none' stroke='#ff4d4d' stroke-width='4'/><path d='M8 8 L24 24' stroke='#ff4d4d' stroke-width='4'/>".to_string(),
            CursorKind::Like => "<path d='M16 28 L4 16 A6 6 0 0 1 16 8 A6 6 0 0 1 28 16 Z' fill='#ff33cc' stroke='#000' stroke-width='1.5'/>".to_string(),
            CursorKind::Negative => "<path d='M6 6 L26 26 M26 6 L6 26' stroke='#ff4d4d' stroke-width='5'/>".to_string(),
            CursorKind::Alternate => "<path d='M16 2 L21 8 H18 V14 H24 V11 L30 16 L24 21 V18 H18 V24 H21 L16 30 L11 24 H14 V18 H8 V21 L2 16 L8 11 V14 H14 V8 H11 Z' fill='#00ffff' stroke='#000' stroke-width='1.5'/>".to_string(),
        };
        let svg = format!("<svg xmlns='http://www.w3.org/2000/svg' width='32' height='32' viewBox='0 0 32 32'>{body}</svg>");
        format!("data:image/svg+xml;utf8,{}", svg.replace('#', "%23"))
    }
}

/// Ordered fallbacks when no `data-cursor` is set; the first selector with
/// a matching ancestor wins.
const RULES: [(&str, CursorKind); 8] = [
    (".cursor-not-allowed", CursorKind::Negative),
    (
        "[disabled], button:disabled, input:disabled, select:disabled, textarea:disabled, [aria-disabled='true'], .disabled",
        CursorKind::Unavailable,
    ),
    ("[aria-busy='true'], .loading, .cursor-wait", CursorKind::Working),
    ("input, textarea, [contenteditable='true']", CursorKind::Text),
    ("[title], [data-tooltip], abbr[title], .help-cursor", CursorKind::Help),
    (".like-button, .heart-button, .favorite-button", CursorKind::Like),
    ("[draggable='true'], .cursor-grab", CursorKind::Alternate),
    (
        "a[href], button, [role='button'], .cursor-pointer, input[type='submit'], input[type='button'], label[for], select",
        CursorKind::Link,
    ),
];

/// Picks the kind from an explicit `data-cursor` value, else from the
/// first rule whose selector `has_ancestor` matches.
pub fn classify(explicit: Option<&str>, has_ancestor: impl Fn(&str) -> bool) -> CursorKind {
    if let Some(kind) = explicit.and_then(CursorKind::from_attr) {
        return kind;
    }
    RULES
        .iter()
        .find(|(selector, _)| has_ancestor(selector))
        .map(|(_, kind)| *kind)
        .unwrap_or(CursorKind::Pointer)
}

fn kind_under(target: Option<web_sys::EventTarget>) -> CursorKind {
    let Some(el) = target.and_then(|t| t.dyn_into::<Element>().ok()) else {
        return CursorKind::Pointer;
    };
    let explicit = el
        .closest("[data-cursor]")
        .ok()
        .flatten()
        .and_then(|root| root.get_attribute("data-cursor"));
    classify(explicit.as_deref(), |selector| {
        el.closest(selector).ok().flatten().is_some()
    })
}

#[function_component]
pub fn CustomCursor() -> Html {
    let node = use_node_ref();
    let kind = use_state_eq(|| CursorKind::Pointer);
    let visible = use_state_eq(|| false);

    {
        let node = node.clone();
        let kind = kind.clone();
        let visible = visible.clone();
        use_effect_with((), move |_| {
            let listeners = web_sys::window().and_then(|w| w.document()).map(|doc| {
                let passive = EventListenerOptions {
                    phase: EventListenerPhase::Bubble,
                    passive: true,
                };
                let capture = EventListenerOptions {
                    phase: EventListenerPhase::Capture,
                    passive: true,
                };
                let on_move = {
                    let visible = visible.clone();
                    EventListener::new_with_options(&doc, "mousemove", passive, move |e| {
                        let Some(e) = e.dyn_ref::<MouseEvent>() else {
                            return;
                        };
                        if let Some(el) = node.cast::<HtmlElement>() {
                            let at = format!("translate({}px, {}px)", e.client_x(), e.client_y());
                            let _ = el.style().set_property("transform", &at);
                        }
                        visible.set(true);
                    })
                };
                let on_over = {
                    let kind = kind.clone();
                    EventListener::new_with_options(&doc, "mouseover", capture, move |e| {
                        kind.set(kind_under(e.target()))
                    })
                };
                let on_focus = EventListener::new_with_options(&doc, "focusin", capture, move |e| {
                    kind.set(kind_under(e.target()))
                });
                let mut out = vec![on_move, on_over, on_focus];
                if let Some(root) = doc.document_element() {
                    let shown = visible.clone();
                    out.push(EventListener::new(&root, "mouseenter", move |_| shown.set(true)));
                    out.push(EventListener::new(&root, "mouseleave", move |_| visible.set(false)));
                }
                out
            });
            move || drop(listeners)
        });
    }

    html! {
        <div
            ref={node}
            aria-hidden="true"
            style={format!("position:fixed; left:0; top:0; z-index:100000; pointer-events:none; display:{};", if *visible { "block" } else { "none" })}
        >
            <img src={kind.glyph()} alt="" draggable="false" width="32" height="32" />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_attribute_wins_over_rules() {
        let kind = classify(Some("like"), |_| true);
        assert_eq!(kind, CursorKind::Like);
    }

    #[test]
    fn unknown_attribute_falls_back_to_rules() {
        let kind = classify(Some("sparkle"), |s| s.contains("button"));
        assert_eq!(kind, CursorKind::Unavailable);
    }

    #[test]
    fn rules_apply_in_order() {
        // A disabled button inside a link-like ancestor reads as unavailable.
        let disabled_button = |s: &str| s.contains("button:disabled") || s.starts_with("a[href]");
        assert_eq!(classify(None, disabled_button), CursorKind::Unavailable);
        assert_eq!(classify(None, |s| s.starts_with("a[href]")), CursorKind::Link);
        assert_eq!(classify(None, |s| s.starts_with("input,")), CursorKind::Text);
        assert_eq!(classify(None, |_| false), CursorKind::Pointer);
    }

    #[test]
    fn every_glyph_is_a_self_contained_svg() {
        let glyphs: Vec<String> = CursorKind::ALL.iter().map(|k| k.glyph()).collect();
        for g in &glyphs {
            assert!(g.starts_with("data:image/svg+xml;utf8,<svg"));
            assert!(!g.contains('#'), "fragment marker would truncate the URI");
        }
        for (i, a) in glyphs.iter().enumerate() {
            assert!(glyphs[i + 1..].iter().all(|b| b != a));
        }
    }

    #[test]
    fn attribute_names_round_trip() {
        for (kind, name) in CursorKind::ALL.iter().zip([
            "pointer",
            "link",
            "text",
            "help",
            "working",
            "unavailable",
            "like",
            "negative",
            "alternate",
        ]) {
            assert_eq!(CursorKind::from_attr(name), Some(*kind));
        }
    }
}
