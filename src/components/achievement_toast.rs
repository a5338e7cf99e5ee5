use gloo::timers::callback::Timeout;
use std::rc::Rc;
use yew::prelude::*;

use crate::context::AppContext;
use crate::events::AppEvent;
use crate::model::MiniGame;
use crate::model::clicker::Achievement;

pub const TOAST_MS: u32 = 4000;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ToastKind {
    Achievement(Achievement),
    HighScore { game: MiniGame, score: u32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
}

/// Toasts are shown one at a time, oldest first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ToastQueue {
    pub items: Vec<Toast>,
    next_id: u64,
}

pub enum ToastAction {
    Push(ToastKind),
    Dismiss(u64),
}

impl Reducible for ToastQueue {
    type Action = ToastAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            ToastAction::Push(kind) => {
                next.items.push(Toast {
                    id: next.next_id,
                    kind,
                });
                next.next_id += 1;
            }
            ToastAction::Dismiss(id) => {
                if !next.items.iter().any(|t| t.id == id) {
                    return self;
                }
                next.items.retain(|t| t.id != id);
            }
        }
        Rc::new(next)
    }
}

impl ToastQueue {
    pub fn front(&self) -> Option<&Toast> {
        self.items.first()
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct AchievementToastProps {
    pub ctx: AppContext,
}

#[function_component]
pub fn AchievementToast(props: &AchievementToastProps) -> Html {
    let ctx = props.ctx.clone();
    let queue = use_reducer(ToastQueue::default);
    {
        let dispatcher = queue.dispatcher();
        use_effect_with(ctx.events.clone(), move |bus| {
            let sub = bus.subscribe(move |e: &AppEvent| match e {
                AppEvent::AchievementUnlocked(a) => {
                    dispatcher.dispatch(ToastAction::Push(ToastKind::Achievement(*a)))
                }
                AppEvent::NewHighScore { game, score } => {
                    dispatcher.dispatch(ToastAction::Push(ToastKind::HighScore {
                        game: *game,
                        score: *score,
                    }))
                }
                _ => {}
            });
            move || drop(sub)
        });
    }
    {
        let dispatcher = queue.dispatcher();
        use_effect_with(queue.front().map(|t| t.id), move |front| {
            let timer = front.map(|id| {
                Timeout::new(TOAST_MS, move || dispatcher.dispatch(ToastAction::Dismiss(id)))
            });
            move || drop(timer)
        });
    }

    let Some(toast) = queue.front() else {
        return html! {};
    };
    let (icon, title, detail) = match toast.kind {
        ToastKind::Achievement(a) => (
            a.icon(),
            ctx.t("achievement.unlocked"),
            ctx.t(a.label_key()),
        ),
        ToastKind::HighScore { game, score } => (
            game.icon(),
            ctx.t("highscore.new"),
            format!("{}: {}", ctx.t(game.label_key()), score),
        ),
    };
    let dismiss = {
        let dispatcher = queue.dispatcher();
        let id = toast.id;
        Callback::from(move |_| dispatcher.dispatch(ToastAction::Dismiss(id)))
    };

    html! {
        <div
            onclick={dismiss}
            style="position:fixed; top:24px; left:50%; transform:translateX(-50%); z-index:9999; min-width:320px; display:flex; align-items:center; gap:16px; padding:14px 20px; background:rgba(22,27,34,0.95); border:2px solid #ffd54f; border-radius:8px; cursor:pointer;"
        >
            <div style="font-size:32px;">{ icon }</div>
            <div style="display:flex; flex-direction:column; gap:2px;">
                <span style="font-size:12px; opacity:0.8;">{ title }</span>
                <span style="color:#ffd54f;">{ detail }</span>
            </div>
            <div style="margin-left:auto; font-size:24px;">{ "🏆" }</div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push(q: Rc<ToastQueue>, kind: ToastKind) -> Rc<ToastQueue> {
        q.reduce(ToastAction::Push(kind))
    }

    #[test]
    fn queue_is_fifo_and_dismiss_is_idempotent() {
        let q = Rc::new(ToastQueue::default());
        let q = push(q, ToastKind::Achievement(Achievement::First100));
        let q = push(
            q,
            ToastKind::HighScore {
                game: MiniGame::Snake,
                score: 40,
            },
        );
        assert_eq!(q.front().map(|t| t.id), Some(0));
        let q = q.reduce(ToastAction::Dismiss(0));
        assert_eq!(q.front().map(|t| t.kind), Some(ToastKind::HighScore { game: MiniGame::Snake, score: 40 }));
        let before = q.clone();
        let q = q.reduce(ToastAction::Dismiss(0));
        assert!(Rc::ptr_eq(&before, &q));
    }
}
