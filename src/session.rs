/*
session.rs

Copyright 2025 Ohmquiz contributors

This file is part of Ohmquiz.

Ohmquiz is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Ohmquiz is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Ohmquiz. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Manage the game in progress.
//!
//! [`GameSession`] is a state machine driven by the player's actions:
//!
//! * [`State::Idle`]: the start screen is shown.
//! * [`State::InRound`]: a question is asked, and the session waits for the answer.
//! * [`State::GameOver`]: a wrong answer ended the game.
//! * [`State::Exited`]: the player quit. No more events are processed.
//!
//! The score is saved on every change so that an interrupted game can be resumed on the next
//! start.

use log::{debug, info, warn};

use rand::rngs::StdRng;
use thiserror::Error;

use crate::circuit::CircuitError;
use crate::config::{GameConfig, MissPolicy};
use crate::round::{Round, RoundGenerator, Verdict};
use crate::saver::{MemoryStore, ScoreStore, StoreError};
use crate::view::GameView;

const CORRECT_MESSAGE: &str = "Correct!";
const TOO_LOW_MESSAGE: &str = "Too low, try again.";
const TOO_HIGH_MESSAGE: &str = "Too high, try again.";
const NOT_DURABLE_MESSAGE: &str = "The scores cannot be saved. They will be lost when you quit.";

/// Session states.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum State {
    Idle,
    InRound,
    GameOver,
    Exited,
}

/// Failures that end the session.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Cannot build a circuit: {0}")]
    Circuit(#[from] CircuitError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Log a persistence failure that does not stop the game.
fn warn_on_error(what: &str, result: Result<(), StoreError>) {
    if let Err(error) = result {
        warn!("Cannot save the {what}: {error}");
    }
}

/// Manage the status of the game.
pub struct GameSession<V: GameView> {
    config: GameConfig,
    view: V,
    store: Box<dyn ScoreStore>,
    generator: RoundGenerator,
    rng: StdRng,
    state: State,

    /// Score of the current game.
    score: u32,

    /// Best score ever achieved.
    best: u32,

    /// Best score when the current game started. Used to tell the player about a new record.
    best_at_start: u32,

    /// Round being played, when the state is [`State::InRound`].
    round: Option<Round>,
}

impl<V: GameView> GameSession<V> {
    /// Create a [`GameSession`] object and load the saved scores.
    ///
    /// If the store cannot be read, the session falls back to a [`MemoryStore`], so that the
    /// game can still be played. A corrupted score is reset: the best score is rewritten as 0,
    /// and the saved game is removed.
    pub fn new(config: GameConfig, view: V, store: Box<dyn ScoreStore>, rng: StdRng) -> Self {
        let generator: RoundGenerator = RoundGenerator::new(&config);
        let mut session: Self = Self {
            config,
            view,
            store,
            generator,
            rng,
            state: State::Idle,
            score: 0,
            best: 0,
            best_at_start: 0,
            round: None,
        };
        session.load_scores();
        session
    }

    /// Read the best score and the score of the interrupted game.
    fn load_scores(&mut self) {
        self.best = match self.store.load_best() {
            Ok(v) => v,
            Err(StoreError::Format(error)) => {
                warn!("Discarding the best score: {error}");
                warn_on_error("best score", self.store.save_best(0));
                0
            }
            Err(error) => {
                warn!("Scores unavailable, continuing without saving them: {error}");
                self.store = Box::new(MemoryStore::new());
                0
            }
        };
        self.score = match self.store.load_progress() {
            Ok(v) => v,
            Err(StoreError::Format(error)) => {
                warn!("Discarding the saved game: {error}");
                warn_on_error("game in progress", self.store.clear_progress());
                0
            }
            Err(error) => {
                warn!("Scores unavailable, continuing without saving them: {error}");
                self.store = Box::new(MemoryStore::new());
                0
            }
        };
        self.best_at_start = self.best;
        debug!("Best score = {}  Saved progress = {}", self.best, self.score);
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn store(&self) -> &dyn ScoreStore {
        self.store.as_ref()
    }

    /// Show the first screen.
    ///
    /// An interrupted game is resumed immediately when the rules allow it. Otherwise the start
    /// screen is shown.
    pub fn start_up(&mut self) -> Result<(), SessionError> {
        if !self.store.is_durable() {
            self.view.show_feedback(NOT_DURABLE_MESSAGE, true);
        }
        if self.config.auto_resume && self.score > 0 {
            info!("Resuming the game with score {}", self.score);
            return self.begin_round();
        }
        self.state = State::Idle;
        self.view.render_idle(self.best, self.score > 0);
        Ok(())
    }

    /// The player starts (or resumes) a game from the start screen.
    pub fn on_start_requested(&mut self) -> Result<(), SessionError> {
        if self.state != State::Idle {
            debug!("Start ignored in state {:?}", self.state);
            return Ok(());
        }
        self.begin_round()
    }

    /// Generate and present a new round.
    fn begin_round(&mut self) -> Result<(), SessionError> {
        let round: Round = self.generator.generate(&mut self.rng)?;
        self.view
            .render_round(&round.view(), round.hidden(), self.score);
        self.view.request_answer();
        self.round = Some(round);
        if self.state != State::InRound {
            debug!("{:?} -> InRound", self.state);
            self.state = State::InRound;
        }
        Ok(())
    }

    /// The player submits an answer.
    ///
    /// Text that is not a number is refused without consuming the round.
    pub fn on_answer_submitted(&mut self, raw: &str) -> Result<(), SessionError> {
        if self.state != State::InRound {
            debug!("Answer ignored in state {:?}", self.state);
            return Ok(());
        }
        let checked = match &self.round {
            Some(round) => round.check(raw, self.config.answer_tolerance),
            None => return Ok(()),
        };
        let verdict: Verdict = match checked {
            Ok(v) => v,
            Err(error) => {
                debug!("Invalid answer: {error}");
                self.view.show_feedback(&error.to_string(), true);
                self.view.request_answer();
                return Ok(());
            }
        };

        match verdict {
            Verdict::Correct => {
                self.score += 1;
                if self.score > self.best {
                    self.best = self.score;
                    warn_on_error("best score", self.store.save_best(self.best));
                }
                warn_on_error("game in progress", self.store.save_progress(self.score));
                self.view.show_feedback(CORRECT_MESSAGE, false);
                self.begin_round()
            }
            Verdict::TooLow | Verdict::TooHigh => match self.config.miss_policy {
                MissPolicy::GameOver => {
                    self.game_over();
                    Ok(())
                }
                MissPolicy::Retry => {
                    let message: &str = if verdict == Verdict::TooLow {
                        TOO_LOW_MESSAGE
                    } else {
                        TOO_HIGH_MESSAGE
                    };
                    self.view.show_feedback(message, false);
                    self.view.request_answer();
                    Ok(())
                }
            },
        }
    }

    /// End the game after a wrong answer.
    fn game_over(&mut self) {
        debug!("InRound -> GameOver with score {}", self.score);
        self.state = State::GameOver;
        self.round = None;
        warn_on_error("game in progress", self.store.save_progress(0));
        self.view
            .render_game_over(self.score, self.best, self.score > self.best_at_start);
    }

    /// The player starts over after a game over.
    pub fn on_restart_requested(&mut self) {
        if self.state != State::GameOver {
            debug!("Restart ignored in state {:?}", self.state);
            return;
        }
        debug!("GameOver -> Idle");
        self.score = 0;
        self.best_at_start = self.best;
        self.generator.reset_rotation();
        warn_on_error("game in progress", self.store.clear_progress());
        self.state = State::Idle;
        self.view.render_idle(self.best, false);
    }

    /// The player quits.
    ///
    /// The score of an unfinished game is saved so that it can be resumed. After a game over,
    /// nothing is left to resume.
    pub fn on_exit_requested(&mut self) -> Result<(), SessionError> {
        if self.state == State::Exited {
            return Ok(());
        }
        let progress: u32 = if self.state == State::GameOver {
            0
        } else {
            self.score
        };
        debug!("{:?} -> Exited, saving progress {progress}", self.state);
        self.state = State::Exited;
        self.round = None;
        self.store.save_progress(progress)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AnswerTolerance, Profile};
    use crate::questions::Category;
    use crate::round::RoundView;
    use crate::saver::scores::SaverScores;
    use rand::SeedableRng;
    use std::io;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Idle { best: u32, can_resume: bool },
        Round { hidden: Category, score: u32 },
        Prompt,
        Feedback { message: String, is_error: bool },
        GameOver { score: u32, best: u32, new_record: bool },
    }

    #[derive(Debug, Default)]
    struct RecordingView {
        calls: Vec<Call>,
    }

    impl RecordingView {
        fn last_feedback(&self) -> Option<(String, bool)> {
            self.calls.iter().rev().find_map(|c| match c {
                Call::Feedback { message, is_error } => Some((message.clone(), *is_error)),
                _ => None,
            })
        }

        /// Calls that change the screen, without the messages and prompts.
        fn screens(&self) -> Vec<Call> {
            self.calls
                .iter()
                .filter(|c| !matches!(c, Call::Feedback { .. } | Call::Prompt))
                .cloned()
                .collect()
        }

        fn rounds(&self) -> usize {
            self.calls
                .iter()
                .filter(|c| matches!(c, Call::Round { .. }))
                .count()
        }
    }

    impl GameView for RecordingView {
        fn render_idle(&mut self, best: u32, can_resume: bool) {
            self.calls.push(Call::Idle { best, can_resume });
        }

        fn render_round(&mut self, _round: &RoundView, hidden: Category, score: u32) {
            self.calls.push(Call::Round { hidden, score });
        }

        fn request_answer(&mut self) {
            self.calls.push(Call::Prompt);
        }

        fn show_feedback(&mut self, message: &str, is_error: bool) {
            self.calls.push(Call::Feedback {
                message: message.to_string(),
                is_error,
            });
        }

        fn render_game_over(&mut self, score: u32, best: u32, new_record: bool) {
            self.calls.push(Call::GameOver {
                score,
                best,
                new_record,
            });
        }
    }

    /// Store that cannot be read nor written.
    struct BrokenStore;

    fn broken() -> StoreError {
        StoreError::Io(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
    }

    impl ScoreStore for BrokenStore {
        fn load_best(&self) -> Result<u32, StoreError> {
            Err(broken())
        }
        fn save_best(&mut self, _score: u32) -> Result<(), StoreError> {
            Err(broken())
        }
        fn load_progress(&self) -> Result<u32, StoreError> {
            Err(broken())
        }
        fn save_progress(&mut self, _score: u32) -> Result<(), StoreError> {
            Err(broken())
        }
        fn clear_progress(&mut self) -> Result<(), StoreError> {
            Err(broken())
        }
    }

    /// Store that can be read but not written.
    struct ReadOnlyStore;

    impl ScoreStore for ReadOnlyStore {
        fn load_best(&self) -> Result<u32, StoreError> {
            Ok(0)
        }
        fn save_best(&mut self, _score: u32) -> Result<(), StoreError> {
            Err(broken())
        }
        fn load_progress(&self) -> Result<u32, StoreError> {
            Ok(0)
        }
        fn save_progress(&mut self, _score: u32) -> Result<(), StoreError> {
            Err(broken())
        }
        fn clear_progress(&mut self) -> Result<(), StoreError> {
            Err(broken())
        }
    }

    fn session_with(config: GameConfig, store: Box<dyn ScoreStore>) -> GameSession<RecordingView> {
        GameSession::new(
            config,
            RecordingView::default(),
            store,
            StdRng::seed_from_u64(42),
        )
    }

    fn started(profile: Profile) -> GameSession<RecordingView> {
        let mut session = session_with(
            GameConfig::from_profile(profile),
            Box::new(MemoryStore::new()),
        );
        session.start_up().unwrap();
        session.on_start_requested().unwrap();
        session
    }

    fn right_answer(session: &GameSession<RecordingView>) -> String {
        format!("{}", session.round().unwrap().answer().trunc())
    }

    fn wrong_answer(session: &GameSession<RecordingView>) -> String {
        format!("{}", session.round().unwrap().answer().trunc() + 10.0)
    }

    #[test]
    fn starts_idle_without_progress() {
        let mut session = session_with(GameConfig::default(), Box::new(MemoryStore::new()));
        session.start_up().unwrap();
        assert_eq!(session.state(), State::Idle);
        assert_eq!(
            session.view().screens(),
            vec![Call::Idle {
                best: 0,
                can_resume: false
            }]
        );

        session.on_start_requested().unwrap();
        assert_eq!(session.state(), State::InRound);
        assert!(session.round().is_some());
    }

    #[test]
    fn correct_answer_scores_and_moves_on() {
        let mut session = started(Profile::Classic);
        let answer = right_answer(&session);
        session.on_answer_submitted(&answer).unwrap();

        assert_eq!(session.state(), State::InRound);
        assert_eq!(session.score(), 1);
        assert_eq!(session.best(), 1);
        assert_eq!(session.view().rounds(), 2);
        assert_eq!(session.store().load_best().unwrap(), 1);
        assert_eq!(session.store().load_progress().unwrap(), 1);
    }

    #[test]
    fn non_numeric_answer_changes_nothing() {
        let mut session = started(Profile::Classic);
        let round = session.round().cloned();
        session.on_answer_submitted("abc").unwrap();

        assert_eq!(session.state(), State::InRound);
        assert_eq!(session.score(), 0);
        assert_eq!(session.round().cloned(), round);
        assert_eq!(session.view().rounds(), 1);
        let (message, is_error) = session.view().last_feedback().unwrap();
        assert!(is_error);
        assert!(message.contains("abc"));
    }

    #[test]
    fn wrong_answer_ends_a_classic_game() {
        let mut session = started(Profile::Classic);
        for _ in 0..2 {
            let answer = right_answer(&session);
            session.on_answer_submitted(&answer).unwrap();
        }
        let answer = wrong_answer(&session);
        session.on_answer_submitted(&answer).unwrap();

        assert_eq!(session.state(), State::GameOver);
        assert!(session.round().is_none());
        assert_eq!(session.store().load_best().unwrap(), 2);
        assert_eq!(session.store().load_progress().unwrap(), 0);
        assert_eq!(
            session.view().calls.last(),
            Some(&Call::GameOver {
                score: 2,
                best: 2,
                new_record: true
            })
        );

        // Answers are ignored until the game restarts
        session.on_answer_submitted("1").unwrap();
        assert_eq!(session.state(), State::GameOver);
    }

    #[test]
    fn lower_score_is_not_a_record() {
        let mut store = MemoryStore::new();
        store.save_best(10).unwrap();
        let mut session = session_with(GameConfig::default(), Box::new(store));
        session.start_up().unwrap();
        session.on_start_requested().unwrap();
        let answer = right_answer(&session);
        session.on_answer_submitted(&answer).unwrap();
        let answer = wrong_answer(&session);
        session.on_answer_submitted(&answer).unwrap();

        assert_eq!(session.store().load_best().unwrap(), 10);
        assert_eq!(
            session.view().calls.last(),
            Some(&Call::GameOver {
                score: 1,
                best: 10,
                new_record: false
            })
        );
    }

    #[test]
    fn wrong_answer_is_retried_in_practice() {
        let mut session = started(Profile::Practice);
        let round = session.round().cloned();
        let answer = wrong_answer(&session);
        session.on_answer_submitted(&answer).unwrap();

        assert_eq!(session.state(), State::InRound);
        assert_eq!(session.round().cloned(), round);
        assert_eq!(
            session.view().last_feedback(),
            Some((TOO_HIGH_MESSAGE.to_string(), false))
        );

        let low = format!("{}", session.round().unwrap().answer().trunc() - 5.0);
        session.on_answer_submitted(&low).unwrap();
        assert_eq!(
            session.view().last_feedback(),
            Some((TOO_LOW_MESSAGE.to_string(), false))
        );

        let answer = right_answer(&session);
        session.on_answer_submitted(&answer).unwrap();
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn exact_tolerance_refuses_off_by_one() {
        let mut config = GameConfig::default();
        config.answer_tolerance = AnswerTolerance::Exact;
        let mut session = session_with(config, Box::new(MemoryStore::new()));
        session.start_up().unwrap();
        session.on_start_requested().unwrap();
        let off = format!("{}", session.round().unwrap().answer().trunc() + 1.0);
        session.on_answer_submitted(&off).unwrap();
        assert_eq!(session.state(), State::GameOver);
    }

    #[test]
    fn restart_resets_the_game() {
        let mut session = started(Profile::Classic);
        let answer = right_answer(&session);
        session.on_answer_submitted(&answer).unwrap();
        let answer = wrong_answer(&session);
        session.on_answer_submitted(&answer).unwrap();
        assert_eq!(session.state(), State::GameOver);

        session.on_restart_requested();
        assert_eq!(session.state(), State::Idle);
        assert_eq!(session.score(), 0);
        assert_eq!(session.best(), 1);
        assert_eq!(session.store().load_progress().unwrap(), 0);
        assert_eq!(
            session.view().calls.last(),
            Some(&Call::Idle {
                best: 1,
                can_resume: false
            })
        );

        session.on_start_requested().unwrap();
        assert_eq!(session.state(), State::InRound);
        // A fresh cycle minus the question just drawn
        assert_eq!(session.generator.rotation().remaining().len(), 2);
    }

    #[test]
    fn restart_is_ignored_during_a_round() {
        let mut session = started(Profile::Classic);
        session.on_restart_requested();
        assert_eq!(session.state(), State::InRound);
    }

    #[test]
    fn exit_saves_the_game_in_progress() {
        let mut session = started(Profile::Classic);
        for _ in 0..3 {
            let answer = right_answer(&session);
            session.on_answer_submitted(&answer).unwrap();
        }
        session.on_exit_requested().unwrap();
        assert_eq!(session.state(), State::Exited);
        assert_eq!(session.store().load_progress().unwrap(), 3);

        // Nothing happens after exiting
        session.on_start_requested().unwrap();
        assert_eq!(session.state(), State::Exited);
    }

    #[test]
    fn exit_after_game_over_saves_nothing_to_resume() {
        let mut session = started(Profile::Classic);
        let answer = right_answer(&session);
        session.on_answer_submitted(&answer).unwrap();
        let answer = wrong_answer(&session);
        session.on_answer_submitted(&answer).unwrap();
        session.on_exit_requested().unwrap();
        assert_eq!(session.store().load_progress().unwrap(), 0);
    }

    #[test]
    fn classic_resumes_at_startup() {
        let mut store = MemoryStore::new();
        store.save_progress(3).unwrap();
        let mut session = session_with(GameConfig::default(), Box::new(store));
        session.start_up().unwrap();

        assert_eq!(session.state(), State::InRound);
        assert_eq!(session.score(), 3);
        assert_eq!(
            session.view().screens().first(),
            Some(&Call::Round {
                hidden: session.round().unwrap().hidden(),
                score: 3
            })
        );
    }

    #[test]
    fn practice_waits_on_the_start_screen() {
        let mut store = MemoryStore::new();
        store.save_progress(3).unwrap();
        let mut session = session_with(GameConfig::from_profile(Profile::Practice), Box::new(store));
        session.start_up().unwrap();

        assert_eq!(session.state(), State::Idle);
        assert_eq!(
            session.view().screens(),
            vec![Call::Idle {
                best: 0,
                can_resume: true
            }]
        );
        session.on_start_requested().unwrap();
        assert_eq!(session.score(), 3);
    }

    #[test]
    fn scores_survive_between_sessions() {
        let dir = TempDir::new().unwrap();
        let open = || Box::new(SaverScores::open(dir.path().to_path_buf()).unwrap());

        let mut session = session_with(GameConfig::default(), open());
        session.start_up().unwrap();
        session.on_start_requested().unwrap();
        for _ in 0..2 {
            let answer = right_answer(&session);
            session.on_answer_submitted(&answer).unwrap();
        }
        session.on_exit_requested().unwrap();

        // The interrupted game resumes with its score
        let mut session = session_with(GameConfig::default(), open());
        assert_eq!(session.best(), 2);
        session.start_up().unwrap();
        assert_eq!(session.state(), State::InRound);
        assert_eq!(session.score(), 2);
        let answer = wrong_answer(&session);
        session.on_answer_submitted(&answer).unwrap();
        session.on_exit_requested().unwrap();

        let mut session = session_with(GameConfig::default(), open());
        session.start_up().unwrap();
        assert_eq!(session.state(), State::Idle);
        assert_eq!(
            session.view().screens(),
            vec![Call::Idle {
                best: 2,
                can_resume: false
            }]
        );
    }

    #[test]
    fn corrupted_progress_is_discarded() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("progress.json"), "{").unwrap();
        let store = SaverScores::open(dir.path().to_path_buf()).unwrap();
        let mut session = session_with(GameConfig::default(), Box::new(store));
        session.start_up().unwrap();

        assert_eq!(session.state(), State::Idle);
        assert!(session.store().is_durable());
        assert!(!dir.path().join("progress.json").exists());
    }

    #[test]
    fn corrupted_best_score_is_reset() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("best_score.json"), "not json").unwrap();
        let store = SaverScores::open(dir.path().to_path_buf()).unwrap();
        let session = session_with(GameConfig::default(), Box::new(store));

        assert_eq!(session.best(), 0);
        assert!(session.store().is_durable());
        assert_eq!(session.store().load_best().unwrap(), 0);
    }

    #[test]
    fn write_failures_during_play_are_tolerated() {
        let mut session = session_with(GameConfig::default(), Box::new(ReadOnlyStore));
        session.start_up().unwrap();
        assert!(session.store().is_durable());
        session.on_start_requested().unwrap();

        let answer = right_answer(&session);
        session.on_answer_submitted(&answer).unwrap();
        assert_eq!(session.state(), State::InRound);
        assert_eq!(session.score(), 1);
        assert_eq!(session.best(), 1);
        assert_eq!(session.view().rounds(), 2);

        let answer = wrong_answer(&session);
        session.on_answer_submitted(&answer).unwrap();
        assert_eq!(session.state(), State::GameOver);
        session.on_restart_requested();
        assert_eq!(session.state(), State::Idle);
    }

    #[test]
    fn write_failure_on_exit_is_reported() {
        let mut session = session_with(GameConfig::default(), Box::new(ReadOnlyStore));
        session.start_up().unwrap();
        session.on_start_requested().unwrap();
        let answer = right_answer(&session);
        session.on_answer_submitted(&answer).unwrap();

        assert!(matches!(
            session.on_exit_requested(),
            Err(SessionError::Store(StoreError::Io(_)))
        ));
        assert_eq!(session.state(), State::Exited);
    }

    #[test]
    fn unavailable_store_falls_back_to_memory() {
        let mut session = session_with(GameConfig::default(), Box::new(BrokenStore));
        session.start_up().unwrap();

        assert!(!session.store().is_durable());
        assert_eq!(
            session.view().last_feedback(),
            Some((NOT_DURABLE_MESSAGE.to_string(), true))
        );
        session.on_start_requested().unwrap();
        let answer = right_answer(&session);
        session.on_answer_submitted(&answer).unwrap();
        assert_eq!(session.best(), 1);
        session.on_exit_requested().unwrap();
    }
}
