//! Pong: player paddle on the left, AI paddle on the right.
//! Positions are in court pixels with the origin at the top-left; the ball
//! position is the top-left corner of its square.

use super::BestScore;
use crate::rng::RandomSource;
use crate::storage::KeyValueStore;

pub const WINNING_SCORE: u32 = 5;

/// Geometry and feel parameters. The defaults reproduce the shipped game;
/// the AI and rally values are tuned by feel and may be recalibrated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PongConfig {
    pub court_width: f64,
    pub court_height: f64,
    pub paddle_width: f64,
    pub paddle_height: f64,
    /// Gap between a court edge and the paddle behind it.
    pub paddle_inset: f64,
    pub ball_size: f64,
    pub paddle_speed: f64,
    /// AI paddle speed as a fraction of `paddle_speed`.
    pub ai_speed_factor: f64,
    /// AI ignores vertical offsets smaller than this.
    pub ai_deadband: f64,
    pub initial_ball_speed: f64,
    /// Horizontal speed multiplier applied on every paddle hit.
    pub rally_multiplier: f64,
    /// Max vertical speed imparted by an edge hit is `spin / 2`.
    pub spin: f64,
    pub winning_score: u32,
}

impl Default for PongConfig {
    fn default() -> Self {
        Self {
            court_width: 400.0,
            court_height: 300.0,
            paddle_width: 10.0,
            paddle_height: 60.0,
            paddle_inset: 10.0,
            ball_size: 10.0,
            paddle_speed: 8.0,
            ai_speed_factor: 0.6,
            ai_deadband: 10.0,
            initial_ball_speed: 4.0,
            rally_multiplier: 1.05,
            spin: 8.0,
            winning_score: WINNING_SCORE,
        }
    }
}

impl PongConfig {
    pub fn max_paddle_y(&self) -> f64 {
        self.court_height - self.paddle_height
    }

    pub fn centered_paddle_y(&self) -> f64 {
        (self.court_height - self.paddle_height) / 2.0
    }

    /// Right edge of the player paddle.
    pub fn player_face_x(&self) -> f64 {
        self.paddle_inset + self.paddle_width
    }

    /// Left edge of the AI paddle.
    pub fn ai_face_x(&self) -> f64 {
        self.court_width - self.paddle_inset - self.paddle_width
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

/// Held keys, sampled at the start of each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PaddleInput {
    pub up: bool,
    pub down: bool,
}

impl PaddleInput {
    /// Applies a key transition; returns false for unrelated keys.
    pub fn apply_key(&mut self, key: &str, pressed: bool) -> bool {
        match key {
            "ArrowUp" | "w" | "W" => self.up = pressed,
            "ArrowDown" | "s" | "S" => self.down = pressed,
            _ => return false,
        }
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Player,
    Ai,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    Skipped,
    InPlay,
    PaddleHit(Side),
    Point(Side),
}

#[derive(Clone, Debug, PartialEq)]
pub struct PongState {
    pub config: PongConfig,
    pub player_y: f64,
    pub ai_y: f64,
    pub ball: Vec2,
    pub velocity: Vec2,
    pub player_score: u32,
    pub ai_score: u32,
    pub high_score: u32,
    pub is_game_over: bool,
    pub is_paused: bool,
    pub input: PaddleInput,
}

impl PongState {
    pub fn new(config: PongConfig, high_score: u32, rng: &mut impl RandomSource) -> Self {
        let mut s = Self {
            config,
            player_y: config.centered_paddle_y(),
            ai_y: config.centered_paddle_y(),
            ball: Vec2::default(),
            velocity: Vec2::default(),
            player_score: 0,
            ai_score: 0,
            high_score,
            is_game_over: false,
            is_paused: false,
            input: PaddleInput::default(),
        };
        s.reset_ball(rng);
        s
    }

    pub fn restart(&mut self, rng: &mut impl RandomSource) {
        *self = PongState::new(self.config, self.high_score, rng);
    }

    pub fn toggle_pause(&mut self) {
        if !self.is_game_over {
            self.is_paused = !self.is_paused;
        }
    }

    pub fn winner(&self) -> Option<Side> {
        if !self.is_game_over {
            None
        } else if self.player_score >= self.config.winning_score {
            Some(Side::Player)
        } else {
            Some(Side::Ai)
        }
    }

    fn reset_ball(&mut self, rng: &mut impl RandomSource) {
        let c = &self.config;
        let speed = c.initial_ball_speed;
        self.ball = Vec2 {
            x: c.court_width / 2.0,
            y: c.court_height / 2.0,
        };
        self.velocity = Vec2 {
            x: if rng.coin_flip() { speed } else { -speed },
            y: if rng.coin_flip() { speed } else { -speed },
        };
    }

    fn overlaps_paddle(&self, paddle_y: f64) -> bool {
        self.ball.y + self.config.ball_size >= paddle_y
            && self.ball.y <= paddle_y + self.config.paddle_height
    }

    /// Vertical velocity after a hit: zero at the paddle center, growing
    /// toward either end.
    fn deflection(&self, paddle_y: f64) -> f64 {
        let c = &self.config;
        let ball_center = self.ball.y + c.ball_size / 2.0;
        let hit_pos = ((ball_center - paddle_y) / c.paddle_height).clamp(0.0, 1.0);
        (hit_pos - 0.5) * c.spin
    }

    /// One physics step: input, AI, ball, walls, paddles, scoring.
    pub fn frame(&mut self, rng: &mut impl RandomSource) -> FrameOutcome {
        if self.is_game_over || self.is_paused {
            return FrameOutcome::Skipped;
        }
        let c = self.config;
        let max_y = c.max_paddle_y();

        if self.input.up {
            self.player_y = (self.player_y - c.paddle_speed).max(0.0);
        }
        if self.input.down {
            self.player_y = (self.player_y + c.paddle_speed).min(max_y);
        }

        let ai_center = self.ai_y + c.paddle_height / 2.0;
        let ball_center = self.ball.y + c.ball_size / 2.0;
        let ai_step = c.paddle_speed * c.ai_speed_factor;
        if ball_center < ai_center - c.ai_deadband {
            self.ai_y = (self.ai_y - ai_step).max(0.0);
        } else if ball_center > ai_center + c.ai_deadband {
            self.ai_y = (self.ai_y + ai_step).min(max_y);
        }

        self.ball.x += self.velocity.x;
        self.ball.y += self.velocity.y;

        let floor = c.court_height - c.ball_size;
        if self.ball.y <= 0.0 {
            self.ball.y = 0.0;
            self.velocity.y = self.velocity.y.abs();
        } else if self.ball.y >= floor {
            self.ball.y = floor;
            self.velocity.y = -self.velocity.y.abs();
        }

        let mut outcome = FrameOutcome::InPlay;
        if self.velocity.x < 0.0
            && self.ball.x <= c.player_face_x()
            && self.overlaps_paddle(self.player_y)
        {
            self.ball.x = c.player_face_x();
            self.velocity.x = self.velocity.x.abs() * c.rally_multiplier;
            self.velocity.y = self.deflection(self.player_y);
            outcome = FrameOutcome::PaddleHit(Side::Player);
        } else if self.velocity.x > 0.0
            && self.ball.x + c.ball_size >= c.ai_face_x()
            && self.overlaps_paddle(self.ai_y)
        {
            self.ball.x = c.ai_face_x() - c.ball_size;
            self.velocity.x = -self.velocity.x.abs() * c.rally_multiplier;
            self.velocity.y = self.deflection(self.ai_y);
            outcome = FrameOutcome::PaddleHit(Side::Ai);
        }

        if self.ball.x <= 0.0 {
            self.ai_score += 1;
            if self.ai_score >= c.winning_score {
                self.is_game_over = true;
            }
            self.reset_ball(rng);
            return FrameOutcome::Point(Side::Ai);
        }
        if self.ball.x >= c.court_width {
            self.player_score += 1;
            if self.player_score > self.high_score {
                self.high_score = self.player_score;
            }
            if self.player_score >= c.winning_score {
                self.is_game_over = true;
            }
            self.reset_ball(rng);
            return FrameOutcome::Point(Side::Player);
        }
        outcome
    }
}

/// Persists a new best in the frame where the player's point set it.
pub fn record_point(
    best: &mut BestScore,
    store: &dyn KeyValueStore,
    state: &PongState,
    outcome: FrameOutcome,
) -> bool {
    outcome == FrameOutcome::Point(Side::Player) && best.record(store, state.high_score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SequenceRandom;
    use crate::storage::{MemoryStore, keys};

    fn state() -> PongState {
        PongState::new(PongConfig::default(), 0, &mut SequenceRandom::new(&[0.9]))
    }

    /// Ball parked mid-court with no vertical motion, paddles far away.
    fn with_ball(x: f64, y: f64, vx: f64) -> PongState {
        let mut s = state();
        s.ball = Vec2 { x, y };
        s.velocity = Vec2 { x: vx, y: 0.0 };
        s
    }

    #[test]
    fn starts_centered() {
        let s = state();
        assert_eq!(s.player_y, 120.0);
        assert_eq!(s.ai_y, 120.0);
        assert_eq!(s.ball, Vec2 { x: 200.0, y: 150.0 });
        assert_eq!(s.velocity, Vec2 { x: 4.0, y: 4.0 });
    }

    #[test]
    fn paddle_stays_in_court_under_held_input() {
        let config = PongConfig {
            winning_score: u32::MAX,
            ..PongConfig::default()
        };
        let mut rng = SequenceRandom::new(&[0.9, 0.2, 0.7]);
        let mut s = PongState::new(config, 0, &mut rng);
        s.input.up = true;
        for _ in 0..200 {
            s.frame(&mut rng);
            assert!(s.player_y >= 0.0 && s.player_y <= s.config.max_paddle_y());
        }
        assert_eq!(s.player_y, 0.0);
        s.input = PaddleInput { up: false, down: true };
        for _ in 0..200 {
            s.frame(&mut rng);
            assert!(s.player_y >= 0.0 && s.player_y <= s.config.max_paddle_y());
        }
        assert_eq!(s.player_y, s.config.max_paddle_y());
    }

    #[test]
    fn ai_holds_still_inside_deadband() {
        let mut s = with_ball(200.0, 145.0, 1.0);
        let before = s.ai_y;
        s.frame(&mut SequenceRandom::new(&[0.9]));
        assert_eq!(s.ai_y, before);
    }

    #[test]
    fn ai_chases_slower_than_player() {
        let mut s = with_ball(200.0, 10.0, 1.0);
        s.frame(&mut SequenceRandom::new(&[0.9]));
        assert!((s.ai_y - (120.0 - 8.0 * 0.6)).abs() < 1e-9);
    }

    #[test]
    fn wall_bounce_inverts_vertical_velocity() {
        let mut s = with_ball(200.0, 2.0, 1.0);
        s.velocity.y = -4.0;
        s.frame(&mut SequenceRandom::new(&[0.9]));
        assert_eq!(s.ball.y, 0.0);
        assert_eq!(s.velocity.y, 4.0);

        let mut s = with_ball(200.0, 288.0, 1.0);
        s.velocity.y = 4.0;
        s.frame(&mut SequenceRandom::new(&[0.9]));
        assert_eq!(s.ball.y, 290.0);
        assert_eq!(s.velocity.y, -4.0);
    }

    #[test]
    fn player_paddle_returns_ball_faster() {
        // Ball centered on the player paddle (120..180), about to cross its face.
        let mut s = with_ball(22.0, 145.0, -4.0);
        let out = s.frame(&mut SequenceRandom::new(&[0.9]));
        assert_eq!(out, FrameOutcome::PaddleHit(Side::Player));
        assert!((s.velocity.x - 4.2).abs() < 1e-9);
        assert!(s.velocity.y.abs() < 1e-9);
        assert_eq!(s.ball.x, 20.0);
    }

    #[test]
    fn edge_hit_deflects_more_than_center_hit() {
        let mut center = with_ball(22.0, 145.0, -4.0);
        center.frame(&mut SequenceRandom::new(&[0.9]));
        let mut edge = with_ball(22.0, 118.0, -4.0);
        edge.frame(&mut SequenceRandom::new(&[0.9]));
        assert!(edge.velocity.y < 0.0);
        assert!(edge.velocity.y.abs() > center.velocity.y.abs());
    }

    #[test]
    fn receding_ball_ignores_paddle() {
        // Moving right while overlapping the player paddle region.
        let mut s = with_ball(15.0, 145.0, 4.0);
        let out = s.frame(&mut SequenceRandom::new(&[0.9]));
        assert_eq!(out, FrameOutcome::InPlay);
        assert_eq!(s.velocity.x, 4.0);
    }

    #[test]
    fn ai_paddle_returns_ball() {
        let mut s = with_ball(372.0, 145.0, 4.0);
        let out = s.frame(&mut SequenceRandom::new(&[0.9]));
        assert_eq!(out, FrameOutcome::PaddleHit(Side::Ai));
        assert!(s.velocity.x < -4.0);
        assert_eq!(s.ball.x, 370.0);
    }

    #[test]
    fn miss_on_left_scores_for_ai_and_recenters() {
        let mut s = with_ball(3.0, 20.0, -4.0);
        s.player_y = 200.0;
        let out = s.frame(&mut SequenceRandom::new(&[0.1]));
        assert_eq!(out, FrameOutcome::Point(Side::Ai));
        assert_eq!(s.ai_score, 1);
        assert_eq!(s.player_score, 0);
        assert_eq!(s.ball, Vec2 { x: 200.0, y: 150.0 });
        assert_eq!(s.velocity, Vec2 { x: -4.0, y: -4.0 });
    }

    #[test]
    fn miss_on_right_scores_for_player_and_raises_high_score() {
        let mut s = with_ball(398.0, 20.0, 4.0);
        s.ai_y = 200.0;
        s.high_score = 0;
        let out = s.frame(&mut SequenceRandom::new(&[0.9]));
        assert_eq!(out, FrameOutcome::Point(Side::Player));
        assert_eq!(s.player_score, 1);
        assert_eq!(s.high_score, 1);
    }

    #[test]
    fn new_best_is_stored_mid_match() {
        let store = MemoryStore::new();
        let mut best = BestScore::load(&store, keys::PONG_HIGH_SCORE);
        let mut s = with_ball(398.0, 20.0, 4.0);
        s.ai_y = 200.0;
        let out = s.frame(&mut SequenceRandom::new(&[0.9]));
        assert!(record_point(&mut best, &store, &s, out));
        assert!(!s.is_game_over);
        assert_eq!(store.get_item(keys::PONG_HIGH_SCORE).unwrap().as_deref(), Some("1"));
        assert!(best.is_round_record(s.player_score));
    }

    #[test]
    fn ai_points_and_rallies_store_nothing() {
        let store = MemoryStore::new();
        let mut best = BestScore::load(&store, keys::PONG_HIGH_SCORE);
        let mut s = with_ball(2.0, 20.0, -4.0);
        s.player_y = 200.0;
        let out = s.frame(&mut SequenceRandom::new(&[0.9]));
        assert_eq!(out, FrameOutcome::Point(Side::Ai));
        assert!(!record_point(&mut best, &store, &s, out));
        assert!(!record_point(&mut best, &store, &s, FrameOutcome::InPlay));
        assert_eq!(store.get_item(keys::PONG_HIGH_SCORE).unwrap(), None);
    }

    #[test]
    fn high_score_not_lowered() {
        let mut s = with_ball(398.0, 20.0, 4.0);
        s.ai_y = 200.0;
        s.high_score = 4;
        s.frame(&mut SequenceRandom::new(&[0.9]));
        assert_eq!(s.high_score, 4);
    }

    #[test]
    fn fifth_point_ends_match_and_freezes_scores() {
        let mut s = with_ball(3.0, 20.0, -4.0);
        s.player_y = 200.0;
        s.ai_score = 4;
        s.frame(&mut SequenceRandom::new(&[0.9]));
        assert_eq!(s.ai_score, 5);
        assert!(s.is_game_over);
        assert_eq!(s.winner(), Some(Side::Ai));
        // Ball was still reset after the deciding point.
        assert_eq!(s.ball, Vec2 { x: 200.0, y: 150.0 });
        let frozen = s.clone();
        assert_eq!(s.frame(&mut SequenceRandom::new(&[0.9])), FrameOutcome::Skipped);
        assert_eq!(s, frozen);
    }

    #[test]
    fn pause_freezes_and_restart_clears_scores() {
        let mut s = state();
        s.toggle_pause();
        let frozen = s.clone();
        assert_eq!(s.frame(&mut SequenceRandom::new(&[0.9])), FrameOutcome::Skipped);
        assert_eq!(s, frozen);
        s.player_score = 3;
        s.ai_score = 2;
        s.high_score = 3;
        s.restart(&mut SequenceRandom::new(&[0.9]));
        assert_eq!((s.player_score, s.ai_score, s.high_score), (0, 0, 3));
        assert!(!s.is_paused);
    }

    #[test]
    fn key_tracking() {
        let mut input = PaddleInput::default();
        assert!(input.apply_key("w", true));
        assert!(input.up);
        assert!(input.apply_key("w", false));
        assert!(!input.up);
        assert!(!input.apply_key("Enter", true));
    }
}
