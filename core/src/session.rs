use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> Running
/// - NotStarted -> Won (first reveal clears the board)
/// - Running -> Won
/// - Running -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    NotStarted,
    Running,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    /// No reveal or flag is accepted anymore.
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Starts the one-second ticker for a session.
///
/// Dropping the returned handle must cancel the ticker.
pub trait TimerSource {
    type Handle;

    fn start(&mut self) -> Self::Handle;
}

/// One game from first reveal to win or loss, together with its clock.
///
/// `H` is the timer handle; the session keeps it only while running, so ending or replacing the
/// session cancels the timer.
#[derive(Debug)]
pub struct GameSession<H> {
    difficulty: Difficulty,
    board: Board,
    status: GameStatus,
    elapsed_secs: u32,
    timer: Option<H>,
}

impl<H> GameSession<H> {
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        log::debug!(
            "New {} game: {:?} with seed {}",
            difficulty.label(),
            difficulty.config(),
            seed
        );
        let board = Board::new(difficulty.config(), seed);
        Self::with_board(difficulty, board)
    }

    pub fn with_board(difficulty: Difficulty, board: Board) -> Self {
        Self {
            difficulty,
            board,
            status: GameStatus::NotStarted,
            elapsed_secs: 0,
            timer: None,
        }
    }

    pub fn difficulty(&self) -> &Difficulty {
        &self.difficulty
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn mines_remaining(&self) -> i32 {
        self.board.mines_remaining()
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn reveal<T, S>(&mut self, pos: Pos, timers: &mut T, scores: &mut S) -> RevealOutcome
    where
        T: TimerSource<Handle = H> + ?Sized,
        S: ScoreStore + ?Sized,
    {
        if self.status.is_finished() {
            return RevealOutcome::NoChange;
        }

        let outcome = self.board.reveal(pos);
        match outcome {
            RevealOutcome::NoChange => {}
            RevealOutcome::Continue => self.mark_started(timers),
            RevealOutcome::HitMine => self.end_game(false, scores),
            RevealOutcome::Won => self.end_game(true, scores),
        }
        outcome
    }

    /// Cancels the clock without ending the game, before the session is replaced.
    pub fn cancel_timer(&mut self) {
        if self.timer.take().is_some() {
            log::debug!("Timer cancelled");
        }
    }

    pub fn toggle_flag(&mut self, pos: Pos) -> FlagOutcome {
        if self.status.is_finished() {
            return FlagOutcome::NoChange;
        }
        self.board.toggle_flag(pos)
    }

    /// Advances the clock by a second. Ignored unless the game is running with a live timer.
    pub fn tick(&mut self) -> bool {
        if self.status == GameStatus::Running && self.timer.is_some() {
            self.elapsed_secs = self.elapsed_secs.saturating_add(1);
            true
        } else {
            false
        }
    }

    /// Best time for this difficulty, `None` if there is none or the store failed.
    pub fn best_time<S: ScoreStore + ?Sized>(&self, scores: &S) -> Option<u32> {
        match scores.best(self.difficulty.label()) {
            Ok(best) => best,
            Err(err) => {
                log::warn!("Could not read best time: {}", err);
                None
            }
        }
    }

    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        self.board.render(renderer);
    }

    fn mark_started<T>(&mut self, timers: &mut T)
    where
        T: TimerSource<Handle = H> + ?Sized,
    {
        if self.status.is_initial() {
            self.status = GameStatus::Running;
            self.timer = Some(timers.start());
            log::debug!("Game started, timer running");
        }
    }

    fn end_game<S: ScoreStore + ?Sized>(&mut self, won: bool, scores: &mut S) {
        if self.status.is_finished() {
            return;
        }

        self.status = if won { GameStatus::Won } else { GameStatus::Lost };
        self.timer = None;
        log::info!(
            "Game {} after {}s on {}",
            if won { "won" } else { "lost" },
            self.elapsed_secs,
            self.difficulty.label()
        );

        self.board.expose_mines();
        if won {
            self.record_best(scores);
        }
    }

    fn record_best<S: ScoreStore + ?Sized>(&self, scores: &mut S) {
        let secs = self.elapsed_secs;
        let improved = self.best_time(scores).is_none_or(|best| secs < best);
        if !improved {
            return;
        }
        match scores.set_best(self.difficulty.label(), secs) {
            Ok(()) => log::debug!("New best time {}s on {}", secs, self.difficulty.label()),
            Err(err) => log::warn!("Could not save best time: {}", err),
        }
    }
}
