//! Game state module - the engine state machine
//!
//! Ties together the grid, piece shapes, collision detection, line
//! clearing, scoring, and the gravity schedule. Every operation runs to
//! completion on the caller's thread; the engine never observes a
//! partially-updated grid or piece. Failure is modeled as state (silent
//! rejection, or the game-over flag), never as an error value.

use crate::collision::{check_placement, Conflict};
use crate::gravity::{drop_interval_ms, GravityTimer};
use crate::grid::Grid;
use crate::pieces::{Shape, SPAWN_POSITION};
use crate::rng::{RandomSource, SimpleRng};
use crate::snapshot::{ActivePiece, GameSnapshot};
use crate::types::{
    Direction, GameAction, LINES_PER_LEVEL, LINE_CLEAR_SCORE, PieceKind, START_LEVEL,
};

/// Active falling piece: a shape plus its anchor position on the grid.
///
/// Transforms build a candidate `Piece` that is validated before it
/// replaces the old one; the active piece is never mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub shape: Shape,
    pub x: i8,
    pub y: i8,
}

impl Piece {
    /// Create a piece of the given kind at the spawn anchor
    pub fn spawn(kind: PieceKind) -> Self {
        let (x, y) = SPAWN_POSITION;
        Self {
            kind,
            shape: Shape::template(kind),
            x,
            y,
        }
    }
}

/// Complete game state
///
/// Generic over the randomness source so games are deterministic per seed
/// and tests can script exact piece sequences.
#[derive(Debug, Clone)]
pub struct GameState<R: RandomSource = SimpleRng> {
    grid: Grid,
    active: Option<Piece>,
    score: u32,
    level: u32,
    lines: u32,
    game_over: bool,
    paused: bool,
    gravity: GravityTimer,
    rng: R,
}

impl GameState<SimpleRng> {
    /// Create a new idle game with the given RNG seed
    pub fn new(seed: u32) -> Self {
        Self::with_rng(SimpleRng::new(seed))
    }
}

impl<R: RandomSource> GameState<R> {
    /// Create a new idle game drawing piece kinds from `rng`.
    ///
    /// The game is inert until [`start`](Self::start) is called: no active
    /// piece exists and gravity is disarmed.
    pub fn with_rng(rng: R) -> Self {
        Self {
            grid: Grid::new(),
            active: None,
            score: 0,
            level: START_LEVEL,
            lines: 0,
            game_over: false,
            paused: false,
            gravity: GravityTimer::disarmed(),
            rng,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn active(&self) -> Option<Piece> {
        self.active
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable grid access for tests and scenario tooling
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Current gravity interval, or `None` while the timer is disarmed
    pub fn gravity_interval_ms(&self) -> Option<u32> {
        self.gravity.is_armed().then(|| self.gravity.interval_ms())
    }

    /// Start (or restart) the game: empty grid, counters reset, fresh
    /// piece, gravity armed at the level-1 interval.
    pub fn start(&mut self) {
        self.grid.clear();
        self.score = 0;
        self.lines = 0;
        self.level = START_LEVEL;
        self.game_over = false;
        self.paused = false;
        self.active = None;
        self.spawn_piece();
        self.gravity = GravityTimer::armed(drop_interval_ms(self.level));
    }

    /// Flip the pause flag, disarming gravity while paused and re-arming
    /// it at the current level's interval on resume.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        self.gravity = if self.paused {
            GravityTimer::disarmed()
        } else {
            GravityTimer::armed(drop_interval_ms(self.level))
        };
    }

    /// Write the current state into a reusable snapshot
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.grid.write_u8_grid(&mut out.grid);
        out.active = self.active.map(ActivePiece::from);
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
        out.game_over = self.game_over;
        out.paused = self.paused;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Try to translate the active piece one cell.
    ///
    /// A blocked lateral move is a silent no-op. A blocked downward move
    /// means the piece has landed: it locks into the grid, completed rows
    /// clear, and the next piece spawns. Returns true when the piece moved
    /// or locked.
    pub fn move_piece(&mut self, direction: Direction) -> bool {
        if self.game_over || self.paused {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };

        let (dx, dy) = direction.offset();
        let (nx, ny) = (piece.x + dx, piece.y + dy);

        if !self.probe(&piece.shape, nx, ny) {
            self.active = Some(Piece {
                x: nx,
                y: ny,
                ..piece
            });
            return true;
        }

        if direction == Direction::Down {
            self.lock_active();
            return true;
        }

        false
    }

    /// Rotate the active piece a clockwise quarter turn.
    ///
    /// The rotated shape is tested at the unchanged anchor; a conflicting
    /// rotation is rejected and the piece left untouched (no wall kicks).
    pub fn rotate(&mut self) -> bool {
        if self.game_over || self.paused {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };

        let rotated = piece.shape.rotated_cw();
        if self.probe(&rotated, piece.x, piece.y) {
            return false;
        }

        self.active = Some(Piece {
            shape: rotated,
            ..piece
        });
        true
    }

    /// Drop the active piece to its maximal resting position and lock it.
    pub fn hard_drop(&mut self) -> bool {
        if self.game_over || self.paused {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };

        // Probe one row at a time; an O(height) scan keeps the drop under
        // the exact same rules as ordinary downward movement.
        let mut distance: i8 = 0;
        while check_placement(&self.grid, &piece.shape, piece.x, piece.y + distance + 1).is_none()
        {
            distance += 1;
        }

        if distance > 0 {
            self.active = Some(Piece {
                y: piece.y + distance,
                ..piece
            });
        }
        self.lock_active();

        // The next piece starts on a fresh drop interval.
        if !self.game_over && !self.paused {
            self.gravity = GravityTimer::armed(drop_interval_ms(self.level));
        }
        true
    }

    /// Advance the gravity schedule by `elapsed_ms` of wall time.
    ///
    /// Each whole interval drained from the accumulator applies one
    /// downward move, exactly as if the player had pressed down. Suspended
    /// while paused or after game over. Returns true when a piece moved or
    /// locked.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.paused || self.game_over {
            return false;
        }

        self.gravity.accumulate(elapsed_ms);

        let mut advanced = false;
        while self.gravity.try_fire() {
            if self.move_piece(Direction::Down) {
                advanced = true;
            }
            if self.game_over {
                break;
            }
        }
        advanced
    }

    /// Apply a game action
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.move_piece(Direction::Left),
            GameAction::MoveRight => self.move_piece(Direction::Right),
            GameAction::MoveDown => self.move_piece(Direction::Down),
            GameAction::Rotate => self.rotate(),
            GameAction::HardDrop => self.hard_drop(),
            GameAction::Pause => {
                self.toggle_pause();
                true
            }
            GameAction::Start => {
                self.start();
                true
            }
        }
    }

    /// Collision probe: ordinary blockage just reports true, while a shape
    /// cell above the ceiling additionally forces the game over.
    fn probe(&mut self, shape: &Shape, x: i8, y: i8) -> bool {
        match check_placement(&self.grid, shape, x, y) {
            None => false,
            Some(Conflict::AboveCeiling) => {
                self.enter_game_over();
                true
            }
            Some(Conflict::Blocked) => true,
        }
    }

    fn enter_game_over(&mut self) {
        self.game_over = true;
        self.gravity = GravityTimer::disarmed();
    }

    /// Piece factory: uniform random kind, spawned at the horizontal
    /// center of the ceiling row. A spawn that conflicts with the stack
    /// ends the game; the conflicting piece still becomes the active one.
    fn spawn_piece(&mut self) {
        let kinds = PieceKind::ALL;
        let kind = kinds[self.rng.next_range(kinds.len() as u32) as usize];
        let piece = Piece::spawn(kind);

        if self.probe(&piece.shape, piece.x, piece.y) {
            self.enter_game_over();
        }
        self.active = Some(piece);
    }

    /// Lock the active piece into the grid, clear completed rows, and
    /// spawn the next piece.
    fn lock_active(&mut self) {
        let Some(piece) = self.active else {
            return;
        };

        // A piece coming to rest partially above the visible ceiling is a
        // stack overflow: end the game without locking.
        if piece.shape.offsets().iter().any(|&(_, dy)| piece.y + dy < 0) {
            self.enter_game_over();
            return;
        }

        for &(dx, dy) in piece.shape.offsets().iter() {
            self.grid.set(piece.x + dx, piece.y + dy, true);
        }
        self.active = None;

        self.apply_line_clears();

        if !self.game_over {
            self.spawn_piece();
        }
    }

    /// Remove completed rows and update the counters.
    fn apply_line_clears(&mut self) {
        let cleared = self.grid.clear_full_rows();
        let n = cleared.len() as u32;
        if n == 0 {
            return;
        }

        let lines_before = self.lines;
        self.lines += n;
        self.score += n * LINE_CLEAR_SCORE * self.level;

        // The threshold check uses the pre-clear line count: at most one
        // level increment per clear event, even when a single clear
        // crosses several multiples of LINES_PER_LEVEL.
        if lines_before + n >= self.level * LINES_PER_LEVEL {
            self.level += 1;
            self.gravity = GravityTimer::armed(drop_interval_ms(self.level));
        }
    }
}

impl Default for GameState<SimpleRng> {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GRID_HEIGHT, GRID_WIDTH};

    /// Always selects the same kind index (see `PieceKind::ALL` order).
    #[derive(Debug, Clone)]
    struct FixedKind(u32);

    impl RandomSource for FixedKind {
        fn next_range(&mut self, max: u32) -> u32 {
            self.0 % max
        }
    }

    fn o_game() -> GameState<FixedKind> {
        // O sits at index 3 of PieceKind::ALL.
        let mut state = GameState::with_rng(FixedKind(3));
        state.start();
        state
    }

    fn i_game() -> GameState<FixedKind> {
        let mut state = GameState::with_rng(FixedKind(0));
        state.start();
        state
    }

    /// Fill row `y` leaving `gap_x` open.
    fn fill_row_except(state: &mut GameState<FixedKind>, y: i8, gap_x: i8) {
        for x in 0..GRID_WIDTH as i8 {
            if x != gap_x {
                state.grid_mut().set(x, y, true);
            }
        }
    }

    #[test]
    fn test_new_game_is_idle() {
        let state = GameState::new(12345);

        assert!(!state.game_over());
        assert!(!state.paused());
        assert_eq!(state.score(), 0);
        assert_eq!(state.level(), START_LEVEL);
        assert_eq!(state.lines(), 0);
        assert!(state.active().is_none());
        assert_eq!(state.gravity_interval_ms(), None);
    }

    #[test]
    fn test_start_spawns_centered_piece_and_arms_gravity() {
        let state = o_game();

        let piece = state.active().unwrap();
        assert_eq!(piece.kind, PieceKind::O);
        assert_eq!((piece.x, piece.y), (4, 0));
        assert_eq!(state.gravity_interval_ms(), Some(1000));
    }

    #[test]
    fn test_operations_are_noops_before_start() {
        let mut state = GameState::new(12345);

        assert!(!state.move_piece(Direction::Left));
        assert!(!state.rotate());
        assert!(!state.hard_drop());
        assert!(!state.tick(10_000));
    }

    #[test]
    fn test_move_left_right() {
        let mut state = o_game();
        let x0 = state.active().unwrap().x;

        assert!(state.move_piece(Direction::Right));
        assert_eq!(state.active().unwrap().x, x0 + 1);

        assert!(state.move_piece(Direction::Left));
        assert_eq!(state.active().unwrap().x, x0);
    }

    #[test]
    fn test_blocked_lateral_move_leaves_piece_unchanged() {
        let mut state = o_game();

        // Walk to the left wall.
        while state.move_piece(Direction::Left) {}
        let piece = state.active().unwrap();
        assert_eq!(piece.x, 0);

        assert!(!state.move_piece(Direction::Left));
        assert_eq!(state.active().unwrap(), piece);
    }

    #[test]
    fn test_down_past_floor_locks_and_respawns() {
        let mut state = o_game();

        // 18 moves bring the 2x2 O to rest on the floor; the 19th locks it.
        for _ in 0..18 {
            assert!(state.move_piece(Direction::Down));
        }
        assert_eq!(state.active().unwrap().y, 18);

        assert!(state.move_piece(Direction::Down));
        assert!(state.grid().is_occupied(4, 19));
        assert!(state.grid().is_occupied(5, 18));

        // A fresh piece replaced the locked one.
        let next = state.active().unwrap();
        assert_eq!((next.x, next.y), (4, 0));
    }

    #[test]
    fn test_rotation_replaces_shape_at_same_anchor() {
        let mut state = i_game();
        let piece = state.active().unwrap();

        assert!(state.rotate());
        let rotated = state.active().unwrap();
        assert_eq!((rotated.x, rotated.y), (piece.x, piece.y));
        assert_eq!(rotated.shape, piece.shape.rotated_cw());
    }

    #[test]
    fn test_rejected_rotation_is_noop() {
        let mut state = i_game();

        // Rotate to vertical (occupies column anchor+2), hug the left wall,
        // then surround the bar so a further rotation cannot fit.
        assert!(state.rotate());
        while state.move_piece(Direction::Left) {}
        let piece = state.active().unwrap();
        assert_eq!(piece.x, -2);

        // The horizontal candidate would need columns -2..1; column -2 and
        // -1 are outside the grid, so the rotation must be rejected.
        assert!(!state.rotate());
        assert_eq!(state.active().unwrap(), piece);
    }

    #[test]
    fn test_hard_drop_locks_at_floor() {
        let mut state = o_game();

        assert!(state.hard_drop());
        assert!(state.grid().is_occupied(4, 19));
        assert!(state.grid().is_occupied(5, 19));
        assert!(state.grid().is_occupied(4, 18));
        assert!(state.grid().is_occupied(5, 18));
        assert!(state.active().is_some());
    }

    #[test]
    fn test_hard_drop_rearms_gravity() {
        let mut state = o_game();

        state.tick(700);
        assert!(state.hard_drop());

        // Fresh interval: the 700ms accrued before the drop is gone.
        assert!(!state.tick(900));
        assert!(state.tick(100));
    }

    #[test]
    fn test_single_line_clear_scores_at_current_level() {
        let mut state = i_game();
        fill_row_except(&mut state, 19, 9);

        // Vertical I occupies column anchor+2; anchor at 7 puts it in the gap.
        assert!(state.rotate());
        for _ in 0..3 {
            assert!(state.move_piece(Direction::Right));
        }
        assert_eq!(state.active().unwrap().x, 7);
        assert!(state.hard_drop());

        assert_eq!(state.lines(), 1);
        assert_eq!(state.score(), LINE_CLEAR_SCORE * START_LEVEL);
        assert_eq!(state.level(), START_LEVEL);
        assert_eq!(state.grid().height(), GRID_HEIGHT);

        // The remainder of the bar settled onto the floor after the clear.
        assert!(state.grid().is_occupied(9, 19));
        assert!(state.grid().is_occupied(9, 18));
        assert!(state.grid().is_occupied(9, 17));
        assert!(!state.grid().is_occupied(9, 16));
    }

    #[test]
    fn test_level_up_applies_after_scoring() {
        let mut state = i_game();

        // Tenth line is about to clear: the threshold is crossed, but the
        // 100 points are awarded at the pre-level-up level.
        state.lines = 9;
        fill_row_except(&mut state, 19, 9);

        assert!(state.rotate());
        for _ in 0..3 {
            assert!(state.move_piece(Direction::Right));
        }
        assert!(state.hard_drop());

        assert_eq!(state.lines(), 10);
        assert_eq!(state.level(), 2);
        assert_eq!(state.score(), LINE_CLEAR_SCORE * START_LEVEL);
        // Gravity now runs at the level-2 interval.
        assert_eq!(state.gravity_interval_ms(), Some(500));
    }

    #[test]
    fn test_level_up_is_at_most_one_per_clear() {
        let mut state = i_game();

        // 8 lines on the books, then a quadruple clear crosses the 10-line
        // threshold (and would reach 12): still a single level increment.
        state.lines = 8;
        for y in 16..20 {
            fill_row_except(&mut state, y, 9);
        }

        assert!(state.rotate());
        for _ in 0..3 {
            assert!(state.move_piece(Direction::Right));
        }
        assert!(state.hard_drop());

        assert_eq!(state.lines(), 12);
        assert_eq!(state.level(), 2);
        assert_eq!(state.score(), 4 * LINE_CLEAR_SCORE * START_LEVEL);
    }

    #[test]
    fn test_no_level_up_below_threshold() {
        let mut state = i_game();
        state.lines = 3;
        fill_row_except(&mut state, 19, 9);

        assert!(state.rotate());
        for _ in 0..3 {
            assert!(state.move_piece(Direction::Right));
        }
        assert!(state.hard_drop());

        assert_eq!(state.lines(), 4);
        assert_eq!(state.level(), START_LEVEL);
    }

    #[test]
    fn test_blocked_spawn_sets_game_over() {
        let mut state = o_game();

        // Occupy the spawn area, then land the current piece: the next
        // spawn conflicts immediately.
        state.grid_mut().set(4, 0, true);
        assert!(state.hard_drop());

        assert!(state.game_over());
        assert_eq!(state.gravity_interval_ms(), None);
    }

    #[test]
    fn test_game_over_blocks_all_operations() {
        let mut state = o_game();
        state.grid_mut().set(4, 0, true);
        state.hard_drop();
        assert!(state.game_over());

        let piece = state.active();
        assert!(!state.move_piece(Direction::Left));
        assert!(!state.rotate());
        assert!(!state.hard_drop());
        assert!(!state.tick(10_000));
        assert_eq!(state.active(), piece);
    }

    #[test]
    fn test_start_recovers_from_game_over() {
        let mut state = o_game();
        state.grid_mut().set(4, 0, true);
        state.hard_drop();
        assert!(state.game_over());

        state.start();
        assert!(!state.game_over());
        assert_eq!(state.score(), 0);
        assert_eq!(state.lines(), 0);
        assert_eq!(state.level(), START_LEVEL);
        assert!(state.grid().cells().iter().all(|&c| !c));
        assert!(state.active().is_some());
    }

    #[test]
    fn test_pause_suspends_gravity_and_operations() {
        let mut state = o_game();
        let piece = state.active().unwrap();

        state.toggle_pause();
        assert!(state.paused());
        assert_eq!(state.gravity_interval_ms(), None);

        assert!(!state.move_piece(Direction::Down));
        assert!(!state.rotate());
        assert!(!state.hard_drop());
        assert!(!state.tick(10_000));
        assert_eq!(state.active().unwrap(), piece);

        state.toggle_pause();
        assert!(!state.paused());
        assert_eq!(state.gravity_interval_ms(), Some(1000));
    }

    #[test]
    fn test_resume_starts_from_a_fresh_interval() {
        let mut state = o_game();

        state.tick(900);
        state.toggle_pause();
        state.toggle_pause();

        // The 900ms accrued before the pause does not carry over.
        assert!(!state.tick(900));
        assert!(state.tick(100));
    }

    #[test]
    fn test_tick_applies_gravity_per_interval() {
        let mut state = o_game();
        let y0 = state.active().unwrap().y;

        assert!(!state.tick(999));
        assert_eq!(state.active().unwrap().y, y0);

        assert!(state.tick(1));
        assert_eq!(state.active().unwrap().y, y0 + 1);
    }

    #[test]
    fn test_tick_drains_multiple_intervals() {
        let mut state = o_game();
        let y0 = state.active().unwrap().y;

        assert!(state.tick(3000));
        assert_eq!(state.active().unwrap().y, y0 + 3);
    }

    #[test]
    fn test_gravity_alone_plays_to_game_over() {
        let mut state = o_game();

        // O pieces stack on the center columns; ten of them fill the
        // playfield and the eleventh spawn must conflict.
        for _ in 0..4000 {
            state.tick(1000);
            if state.game_over() {
                break;
            }
        }

        assert!(state.game_over());
        assert_eq!(state.lines(), 0);
    }

    #[test]
    fn test_snapshot_mirrors_state() {
        let mut state = o_game();
        state.hard_drop();

        let snap = state.snapshot();
        assert_eq!(snap.score, state.score());
        assert_eq!(snap.level, state.level());
        assert_eq!(snap.lines, state.lines());
        assert_eq!(snap.game_over, state.game_over());
        assert_eq!(snap.paused, state.paused());
        assert_eq!(snap.grid[19][4], 1);
        assert_eq!(snap.grid[0][0], 0);

        let active = snap.active.unwrap();
        let piece = state.active().unwrap();
        assert_eq!((active.x, active.y), (piece.x, piece.y));
        assert_eq!(active.kind, piece.kind);
        assert!(snap.playable());
    }

    #[test]
    fn test_apply_action_dispatch() {
        let mut state = o_game();
        let x0 = state.active().unwrap().x;

        assert!(state.apply_action(GameAction::MoveRight));
        assert_eq!(state.active().unwrap().x, x0 + 1);
        assert!(state.apply_action(GameAction::MoveLeft));
        assert_eq!(state.active().unwrap().x, x0);

        assert!(state.apply_action(GameAction::Pause));
        assert!(state.paused());
        assert!(state.apply_action(GameAction::Pause));
        assert!(!state.paused());

        assert!(state.apply_action(GameAction::HardDrop));
        assert!(state.grid().is_occupied(4, 19));

        assert!(state.apply_action(GameAction::Start));
        assert_eq!(state.score(), 0);
        assert!(state.grid().cells().iter().all(|&c| !c));
    }

    #[test]
    fn test_seeded_games_are_identical() {
        let mut a = GameState::new(777);
        let mut b = GameState::new(777);
        a.start();
        b.start();

        for _ in 0..50 {
            a.apply_action(GameAction::HardDrop);
            b.apply_action(GameAction::HardDrop);
        }

        assert_eq!(a.grid(), b.grid());
        assert_eq!(a.active().map(|p| p.kind), b.active().map(|p| p.kind));
        assert_eq!(a.score(), b.score());
    }
}
