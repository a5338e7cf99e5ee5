//! Incremental clicker: points from clicks and a passive per-second yield,
//! spent on two upgrade tracks. Progress survives across sessions.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;
use thiserror::Error;
use yew::Reducible;

use crate::storage::{self, KeyValueStore, keys};

pub const PASSIVE_TICK_MS: u32 = 1000;
pub const POWER_COST_STEP: u64 = 50;
pub const AUTO_COST_STEP: u64 = 100;
/// How long a "+N" click marker stays on screen.
pub const FLOATING_NUMBER_MS: u32 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Achievement {
    #[serde(rename = "first100")]
    First100,
    #[serde(rename = "first1000")]
    First1000,
    #[serde(rename = "first10000")]
    First10000,
    #[serde(rename = "powerUp")]
    PowerUp,
    #[serde(rename = "automate")]
    Automate,
}

impl Achievement {
    pub const ALL: [Achievement; 5] = [
        Achievement::First100,
        Achievement::First1000,
        Achievement::First10000,
        Achievement::PowerUp,
        Achievement::Automate,
    ];

    pub fn is_met(self, s: &ClickerState) -> bool {
        match self {
            Achievement::First100 => s.total_points >= 100,
            Achievement::First1000 => s.total_points >= 1_000,
            Achievement::First10000 => s.total_points >= 10_000,
            Achievement::PowerUp => s.click_power >= 5,
            Achievement::Automate => s.auto_yield_rate >= 3,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Achievement::First100 => "🥉",
            Achievement::First1000 => "🥈",
            Achievement::First10000 => "🥇",
            Achievement::PowerUp => "⚡",
            Achievement::Automate => "🤖",
        }
    }

    /// Translation key of the achievement name.
    pub fn label_key(self) -> &'static str {
        match self {
            Achievement::First100 => "achievement.first100",
            Achievement::First1000 => "achievement.first1000",
            Achievement::First10000 => "achievement.first10000",
            Achievement::PowerUp => "achievement.powerUp",
            Achievement::Automate => "achievement.automate",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Upgrade {
    Power,
    Auto,
}

impl Upgrade {
    pub fn cost(self, s: &ClickerState) -> u64 {
        match self {
            Upgrade::Power => s.click_power.saturating_mul(POWER_COST_STEP),
            Upgrade::Auto => s.auto_yield_rate.saturating_add(1).saturating_mul(AUTO_COST_STEP),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PurchaseError {
    #[error("upgrade costs {cost} but only {available} points are available")]
    InsufficientPoints { cost: u64, available: u64 },
}

/// Field names match save blobs written by earlier releases.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickerState {
    #[serde(rename = "clicks")]
    pub points: u64,
    #[serde(rename = "totalClicks")]
    pub total_points: u64,
    #[serde(rename = "clickPower")]
    pub click_power: u64,
    #[serde(rename = "autoClickers")]
    pub auto_yield_rate: u64,
    pub achievements: BTreeSet<Achievement>,
    /// Unlocked by the most recent operation; consumed by the view.
    #[serde(skip)]
    pub last_unlocked: Vec<Achievement>,
    /// Bumped on every accepted mutation so views can key effects on it.
    #[serde(skip)]
    pub version: u64,
}

impl Default for ClickerState {
    fn default() -> Self {
        Self {
            points: 0,
            total_points: 0,
            click_power: 1,
            auto_yield_rate: 0,
            achievements: BTreeSet::new(),
            last_unlocked: Vec::new(),
            version: 0,
        }
    }
}

impl ClickerState {
    /// Restores saved progress; anything unreadable starts fresh.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let mut s = storage::load_json(store, keys::CLICKER_SAVE, ClickerState::default()).into_inner();
        s.click_power = s.click_power.max(1);
        s.total_points = s.total_points.max(s.points);
        s.last_unlocked.clear();
        s
    }

    pub fn save(&self, store: &dyn KeyValueStore) {
        storage::persist(store, keys::CLICKER_SAVE, self);
    }

    fn earn(&mut self, amount: u64) {
        self.points = self.points.saturating_add(amount);
        self.total_points = self.total_points.saturating_add(amount);
    }

    fn settle(&mut self) -> Vec<Achievement> {
        self.version += 1;
        self.last_unlocked = self.evaluate_achievements();
        self.last_unlocked.clone()
    }

    pub fn click(&mut self) -> Vec<Achievement> {
        self.earn(self.click_power);
        self.settle()
    }

    /// Passive yield for one second; no-op without auto upgrades.
    pub fn passive_tick(&mut self) -> Vec<Achievement> {
        if self.auto_yield_rate == 0 {
            return Vec::new();
        }
        self.earn(self.auto_yield_rate);
        self.settle()
    }

    pub fn can_afford(&self, upgrade: Upgrade) -> bool {
        self.points >= upgrade.cost(self)
    }

    pub fn buy(&mut self, upgrade: Upgrade) -> Result<Vec<Achievement>, PurchaseError> {
        let cost = upgrade.cost(self);
        if self.points < cost {
            return Err(PurchaseError::InsufficientPoints {
                cost,
                available: self.points,
            });
        }
        self.points -= cost;
        match upgrade {
            Upgrade::Power => self.click_power += 1,
            Upgrade::Auto => self.auto_yield_rate += 1,
        }
        Ok(self.settle())
    }

    /// Unlocks newly satisfied achievements; never removes one.
    pub fn evaluate_achievements(&mut self) -> Vec<Achievement> {
        let current: &ClickerState = self;
        let fresh: Vec<Achievement> = Achievement::ALL
            .into_iter()
            .filter(|a| !current.achievements.contains(a) && a.is_met(current))
            .collect();
        self.achievements.extend(fresh.iter().copied());
        fresh
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ClickerAction {
    Click,
    PassiveTick,
    Buy(Upgrade),
}

impl Reducible for ClickerState {
    type Action = ClickerAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            ClickerAction::Click => {
                next.click();
            }
            ClickerAction::PassiveTick => {
                if next.auto_yield_rate == 0 {
                    return self;
                }
                next.passive_tick();
            }
            ClickerAction::Buy(upgrade) => {
                if next.buy(upgrade).is_err() {
                    return self;
                }
            }
        }
        Rc::new(next)
    }
}

/// Transient "+N" marker drawn where the click landed.
#[derive(Clone, Debug, PartialEq)]
pub struct FloatingNumber {
    pub id: u64,
    pub value: u64,
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FloatingFeed {
    pub items: Vec<FloatingNumber>,
    pub next_id: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FloatingAction {
    Push { value: u64, x: f64, y: f64 },
    Expire(u64),
}

impl Reducible for FloatingFeed {
    type Action = FloatingAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            FloatingAction::Push { value, x, y } => {
                next.items.push(FloatingNumber {
                    id: next.next_id,
                    value,
                    x,
                    y,
                });
                next.next_id += 1;
            }
            FloatingAction::Expire(id) => {
                if !next.items.iter().any(|n| n.id == id) {
                    return self;
                }
                next.items.retain(|n| n.id != id);
            }
        }
        Rc::new(next)
    }
}

/// Expiry handles of the markers on screen, keyed by marker id. Dropping
/// the set (or a handle) cancels that expiry.
#[derive(Debug)]
pub struct ExpiryTimers<T> {
    pending: HashMap<u64, T>,
}

impl<T> Default for ExpiryTimers<T> {
    fn default() -> Self {
        Self {
            pending: HashMap::new(),
        }
    }
}

impl<T> ExpiryTimers<T> {
    /// Tracks `timer` for marker `id` and forgets handles whose marker is
    /// no longer in `live`; those have already fired.
    pub fn track(&mut self, id: u64, timer: T, live: &[FloatingNumber]) {
        self.pending.retain(|k, _| live.iter().any(|n| n.id == *k));
        self.pending.insert(id, timer);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
