//! Snake on a square grid, advanced one cell per tick.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::rc::Rc;
use yew::Reducible;

use crate::rng::{JsRandom, RandomSource};

pub const GRID_SIZE: i32 = 15;
pub const BASE_TICK_MS: u32 = 150;
/// Largest amount the score may shave off the tick interval.
pub const MAX_SPEEDUP_MS: u32 = 100;
pub const POINTS_PER_FOOD: u32 = 10;
pub const START_CELL: Cell = Cell { x: 7, y: 7 };
pub const START_FOOD: Cell = Cell { x: 5, y: 5 };

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn step(self, dir: Direction) -> Cell {
        let (dx, dy) = dir.delta();
        Cell {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn in_bounds(self, size: i32) -> bool {
        self.x >= 0 && self.y >= 0 && self.x < size && self.y < size
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Arrow keys and WASD.
    pub fn from_key(key: &str) -> Option<Direction> {
        match key {
            "ArrowUp" | "w" | "W" => Some(Direction::Up),
            "ArrowDown" | "s" | "S" => Some(Direction::Down),
            "ArrowLeft" | "a" | "A" => Some(Direction::Left),
            "ArrowRight" | "d" | "D" => Some(Direction::Right),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Paused or already over; nothing changed.
    Skipped,
    Moved,
    Ate,
    HitWall,
    HitSelf,
    /// Ate the last free cell; nowhere left to put food.
    BoardFull,
}

impl TickOutcome {
    pub fn ends_game(self) -> bool {
        matches!(
            self,
            TickOutcome::HitWall | TickOutcome::HitSelf | TickOutcome::BoardFull
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SnakeState {
    pub grid_size: i32,
    /// Head first.
    pub segments: VecDeque<Cell>,
    pub food: Cell,
    /// Direction applied by the last tick.
    pub direction: Direction,
    /// Requested direction, applied at the start of the next tick.
    pub queued_direction: Direction,
    pub score: u32,
    pub high_score: u32,
    pub is_game_over: bool,
    pub is_paused: bool,
    pub ticks: u64,
    /// Result of the last tick that ran.
    pub last_outcome: TickOutcome,
}

impl SnakeState {
    pub fn new(high_score: u32) -> Self {
        Self {
            grid_size: GRID_SIZE,
            segments: VecDeque::from([START_CELL]),
            food: START_FOOD,
            direction: Direction::Right,
            queued_direction: Direction::Right,
            score: 0,
            high_score,
            is_game_over: false,
            is_paused: false,
            ticks: 0,
            last_outcome: TickOutcome::Skipped,
        }
    }

    /// Fresh round keeping the high score; food placed at random.
    pub fn restart(&mut self, rng: &mut impl RandomSource) {
        let high_score = self.high_score;
        *self = SnakeState::new(high_score);
        if let Some(food) = self.random_free_cell(rng) {
            self.food = food;
        }
    }

    pub fn head(&self) -> Cell {
        self.segments.front().copied().unwrap_or(START_CELL)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.segments.contains(&cell)
    }

    /// Interval until the next tick; shrinks with score down to a floor.
    pub fn tick_interval_ms(&self) -> u32 {
        BASE_TICK_MS - self.score.min(MAX_SPEEDUP_MS)
    }

    pub fn is_running(&self) -> bool {
        !self.is_game_over && !self.is_paused
    }

    /// Buffers a turn. Reversing onto the neck is ignored.
    pub fn turn(&mut self, dir: Direction) -> bool {
        if self.is_game_over || dir == self.direction.opposite() {
            return false;
        }
        self.queued_direction = dir;
        true
    }

    pub fn toggle_pause(&mut self) {
        if !self.is_game_over {
            self.is_paused = !self.is_paused;
        }
    }

    pub fn tick(&mut self, rng: &mut impl RandomSource) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Skipped;
        }
        self.ticks += 1;
        self.direction = self.queued_direction;
        let head = self.head().step(self.direction);
        if !head.in_bounds(self.grid_size) {
            self.is_game_over = true;
            return TickOutcome::HitWall;
        }
        if self.occupies(head) {
            self.is_game_over = true;
            return TickOutcome::HitSelf;
        }
        self.segments.push_front(head);
        if head != self.food {
            self.segments.pop_back();
            return TickOutcome::Moved;
        }
        self.score += POINTS_PER_FOOD;
        if self.score > self.high_score {
            self.high_score = self.score;
        }
        match self.random_free_cell(rng) {
            Some(cell) => {
                self.food = cell;
                TickOutcome::Ate
            }
            None => {
                self.is_game_over = true;
                TickOutcome::BoardFull
            }
        }
    }

    fn random_free_cell(&self, rng: &mut impl RandomSource) -> Option<Cell> {
        let free: Vec<Cell> = (0..self.grid_size)
            .flat_map(|y| (0..self.grid_size).map(move |x| Cell { x, y }))
            .filter(|c| !self.occupies(*c))
            .collect();
        if free.is_empty() {
            return None;
        }
        Some(free[rng.next_index(free.len())])
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnakeAction {
    Tick,
    Turn(Direction),
    TogglePause,
    Restart,
}

impl Reducible for SnakeState {
    type Action = SnakeAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            SnakeAction::Tick => {
                let outcome = next.tick(&mut JsRandom);
                if outcome == TickOutcome::Skipped {
                    return self;
                }
                next.last_outcome = outcome;
            }
            SnakeAction::Turn(dir) => {
                if !next.turn(dir) {
                    return self;
                }
            }
            SnakeAction::TogglePause => next.toggle_pause(),
            SnakeAction::Restart => next.restart(&mut JsRandom),
        }
        Rc::new(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SequenceRandom;

    fn snake_at(cells: &[(i32, i32)], dir: Direction, food: (i32, i32)) -> SnakeState {
        let mut s = SnakeState::new(0);
        s.segments = cells.iter().map(|&(x, y)| Cell { x, y }).collect();
        s.direction = dir;
        s.queued_direction = dir;
        s.food = Cell {
            x: food.0,
            y: food.1,
        };
        s
    }

    #[test]
    fn two_ticks_right_without_food() {
        let mut s = SnakeState::new(0);
        let mut rng = SequenceRandom::new(&[0.0]);
        assert!(s.turn(Direction::Right));
        assert_eq!(s.tick(&mut rng), TickOutcome::Moved);
        assert!(s.turn(Direction::Right));
        assert_eq!(s.tick(&mut rng), TickOutcome::Moved);
        assert_eq!(s.head(), Cell { x: 9, y: 7 });
        assert_eq!(s.len(), 1);
        assert_eq!(s.score, 0);
    }

    #[test]
    fn head_moves_exactly_one_cell_per_tick() {
        let mut s = SnakeState::new(0);
        let mut rng = SequenceRandom::new(&[0.3]);
        for dir in [Direction::Up, Direction::Left, Direction::Down, Direction::Down] {
            let before = s.head();
            s.turn(dir);
            s.tick(&mut rng);
            let after = s.head();
            assert_eq!((after.x - before.x).abs() + (after.y - before.y).abs(), 1);
            assert_eq!(after, before.step(s.direction));
        }
    }

    #[test]
    fn eating_grows_scores_and_moves_food_off_snake() {
        let mut s = snake_at(&[(3, 3), (2, 3)], Direction::Right, (4, 3));
        // First free cell in row-major order is (0,0).
        let mut rng = SequenceRandom::new(&[0.0]);
        assert_eq!(s.tick(&mut rng), TickOutcome::Ate);
        assert_eq!(s.len(), 3);
        assert_eq!(s.score, POINTS_PER_FOOD);
        assert_eq!(s.high_score, POINTS_PER_FOOD);
        assert_eq!(s.food, Cell { x: 0, y: 0 });
        assert!(!s.occupies(s.food));
    }

    #[test]
    fn food_never_lands_on_body() {
        let mut s = snake_at(&[(1, 0), (0, 0)], Direction::Right, (2, 0));
        let mut rng = SequenceRandom::new(&[0.0]);
        s.tick(&mut rng);
        // (0,0) (1,0) (2,0) are occupied, so index 0 of the free list is (3,0).
        assert_eq!(s.food, Cell { x: 3, y: 0 });
    }

    #[test]
    fn score_unchanged_when_missing_food() {
        let mut s = snake_at(&[(3, 3)], Direction::Down, (10, 10));
        let mut rng = SequenceRandom::new(&[0.5]);
        s.tick(&mut rng);
        assert_eq!(s.score, 0);
        assert_eq!(s.food, Cell { x: 10, y: 10 });
    }

    #[test]
    fn wall_collision_ends_game_and_freezes() {
        let mut s = snake_at(&[(14, 4)], Direction::Right, (0, 0));
        let mut rng = SequenceRandom::new(&[0.5]);
        assert_eq!(s.tick(&mut rng), TickOutcome::HitWall);
        assert!(s.is_game_over);
        let frozen = s.clone();
        assert_eq!(s.tick(&mut rng), TickOutcome::Skipped);
        assert_eq!(s, frozen);
    }

    #[test]
    fn top_and_left_walls_end_game() {
        let mut rng = SequenceRandom::new(&[0.5]);
        let mut up = snake_at(&[(4, 0)], Direction::Up, (9, 9));
        assert_eq!(up.tick(&mut rng), TickOutcome::HitWall);
        let mut left = snake_at(&[(0, 4)], Direction::Left, (9, 9));
        assert_eq!(left.tick(&mut rng), TickOutcome::HitWall);
    }

    #[test]
    fn self_collision_ends_game() {
        // Head at (2,2) moving Up into (2,1), which is part of the body.
        let mut s = snake_at(
            &[(2, 2), (3, 2), (3, 1), (2, 1), (1, 1)],
            Direction::Left,
            (9, 9),
        );
        s.turn(Direction::Up);
        let mut rng = SequenceRandom::new(&[0.5]);
        assert_eq!(s.tick(&mut rng), TickOutcome::HitSelf);
        assert!(s.is_game_over);
    }

    #[test]
    fn opposite_turn_is_rejected() {
        let mut s = SnakeState::new(0);
        assert!(!s.turn(Direction::Left));
        assert_eq!(s.queued_direction, Direction::Right);
    }

    #[test]
    fn turn_is_buffered_until_next_tick() {
        let mut s = SnakeState::new(0);
        assert!(s.turn(Direction::Up));
        assert_eq!(s.direction, Direction::Right);
        // Still moving right, so Left stays illegal even after queuing Up.
        assert!(!s.turn(Direction::Left));
        s.tick(&mut SequenceRandom::new(&[0.5]));
        assert_eq!(s.direction, Direction::Up);
        assert_eq!(s.head(), Cell { x: 7, y: 6 });
    }

    #[test]
    fn paused_ticks_are_skipped() {
        let mut s = SnakeState::new(0);
        s.toggle_pause();
        let before = s.clone();
        assert_eq!(s.tick(&mut SequenceRandom::new(&[0.5])), TickOutcome::Skipped);
        assert_eq!(s, before);
        s.toggle_pause();
        assert_eq!(s.tick(&mut SequenceRandom::new(&[0.5])), TickOutcome::Moved);
    }

    #[test]
    fn speed_floor() {
        let mut s = SnakeState::new(0);
        assert_eq!(s.tick_interval_ms(), 150);
        s.score = 40;
        assert_eq!(s.tick_interval_ms(), 110);
        s.score = 500;
        assert_eq!(s.tick_interval_ms(), 50);
    }

    #[test]
    fn full_board_ends_game() {
        let mut s = SnakeState::new(0);
        s.grid_size = 2;
        s.segments = VecDeque::from([Cell { x: 0, y: 1 }, Cell { x: 1, y: 1 }, Cell { x: 1, y: 0 }]);
        s.direction = Direction::Up;
        s.queued_direction = Direction::Up;
        s.food = Cell { x: 0, y: 0 };
        assert_eq!(s.tick(&mut SequenceRandom::new(&[0.5])), TickOutcome::BoardFull);
        assert!(s.is_game_over);
        assert_eq!(s.len(), 4);
    }

    #[test]
    fn restart_keeps_high_score_only() {
        let mut s = snake_at(&[(3, 3), (2, 3)], Direction::Right, (4, 3));
        let mut rng = SequenceRandom::new(&[0.0]);
        s.tick(&mut rng);
        s.is_game_over = true;
        s.restart(&mut rng);
        assert_eq!(s.high_score, 10);
        assert_eq!(s.score, 0);
        assert_eq!(s.segments, VecDeque::from([START_CELL]));
        assert!(!s.is_game_over);
        assert!(!s.occupies(s.food));
    }

    #[test]
    fn key_mapping() {
        assert_eq!(Direction::from_key("W"), Some(Direction::Up));
        assert_eq!(Direction::from_key("ArrowLeft"), Some(Direction::Left));
        assert_eq!(Direction::from_key("q"), None);
    }

    #[test]
    fn reducer_ignores_rejected_turns() {
        let state = Rc::new(SnakeState::new(0));
        let next = state.clone().reduce(SnakeAction::Turn(Direction::Left));
        assert!(Rc::ptr_eq(&state, &next));
        let next = state.clone().reduce(SnakeAction::TogglePause);
        assert!(next.is_paused);
    }
}
