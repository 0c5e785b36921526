/*
terminal.rs

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

//! Play in a terminal.
//!
//! [`TerminalView`] prints the screens, and [`run`] reads the player's lines and forwards them to
//! the [`GameSession`].
//! Closing the input (Ctrl+D) quits the game the same way as the `quit` command.

use log::{debug, warn};
use std::fmt::Write as _;
use std::io::{BufRead, Write};

use crate::circuit::Topology;
use crate::questions::Category;
use crate::round::{RoundView, Shown};
use crate::session::{GameSession, SessionError, State};
use crate::view::GameView;

/// Player actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Restart,
    Quit,
    Answer(String),

    /// Text that means nothing in the current state.
    Unknown(String),
}

/// Interpret a line typed by the player.
///
/// `q`, `quit`, and `exit` quit from any screen. On the start screen, an empty line or `start`
/// starts the game. After a game over, `r` or `restart` starts over. During a round, everything
/// else is an answer.
pub fn parse_command(state: State, line: &str) -> Command {
    let text: String = line.trim().to_lowercase();
    if matches!(text.as_str(), "q" | "quit" | "exit") {
        return Command::Quit;
    }
    match state {
        State::Idle => match text.as_str() {
            "" | "s" | "start" => Command::Start,
            _ => Command::Unknown(line.trim().to_string()),
        },
        State::InRound => Command::Answer(line.trim().to_string()),
        State::GameOver => match text.as_str() {
            "r" | "restart" => Command::Restart,
            _ => Command::Unknown(line.trim().to_string()),
        },
        State::Exited => Command::Quit,
    }
}

/// Read the player's lines until they quit or close the input.
///
/// The session always goes through its exit step, so that the game in progress is saved.
pub fn run<V: GameView, R: BufRead>(
    session: &mut GameSession<V>,
    input: R,
) -> Result<(), SessionError> {
    let played: Result<(), SessionError> = play(session, input);
    if let Err(error) = &played {
        warn!("The game stopped: {error}");
    }
    let exited: Result<(), SessionError> = session.on_exit_requested();
    played.and(exited)
}

/// Forward the player's lines to the session, until `quit` or the end of the input.
fn play<V: GameView, R: BufRead>(
    session: &mut GameSession<V>,
    input: R,
) -> Result<(), SessionError> {
    session.start_up()?;
    for line in input.lines() {
        let line: String = match line {
            Ok(l) => l,
            Err(error) => {
                warn!("Cannot read the input: {error}");
                break;
            }
        };
        match parse_command(session.state(), &line) {
            Command::Start => session.on_start_requested()?,
            Command::Restart => session.on_restart_requested(),
            Command::Answer(text) => session.on_answer_submitted(&text)?,
            Command::Quit => break,
            Command::Unknown(text) => {
                debug!("Unknown command {text:?} in state {:?}", session.state());
                session
                    .view_mut()
                    .show_feedback(&format!("Unknown command \"{text}\"."), true);
            }
        }
    }
    Ok(())
}

/// Text for a quantity.
fn shown(value: Shown, unit: &str) -> String {
    match value {
        Shown::Value(v) => format!("{v}{unit}"),
        Shown::Hidden | Shown::Omitted => format!("?{unit}"),
    }
}

/// Draw the resistor network.
///
/// ```text
/// series:    o---[ 10Ω ]---[ ?Ω ]---o
///
/// parallel:  o---+---[ 10Ω ]---+---o
///                +---[  ?Ω ]---+
/// ```
pub fn diagram(view: &RoundView) -> String {
    let labels: Vec<String> = view.resistors.iter().map(|r| shown(*r, "Ω")).collect();
    let mut out: String = String::new();

    match view.topology {
        Topology::Series => {
            out.push_str("o---");
            for label in &labels {
                let _ = write!(out, "[ {label} ]---");
            }
            out.push_str("o\n");
        }
        Topology::Parallel => {
            let width: usize = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
            for (i, label) in labels.iter().enumerate() {
                let (left, right) = if i == 0 {
                    ("o---+", "+---o")
                } else {
                    ("    +", "+")
                };
                let _ = writeln!(out, "{left}---[ {label:>width$} ]---{right}");
            }
        }
    }
    out
}

/// Present the game on a terminal, or any other [`Write`] object.
pub struct TerminalView<W: Write> {
    out: W,
}

impl<W: Write> TerminalView<W> {
    /// Create a [`TerminalView`] object.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    fn emit(&mut self, text: &str) {
        let result = self
            .out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush());
        if let Err(error) = result {
            warn!("Cannot write to the terminal: {error}");
        }
    }
}

impl<W: Write> GameView for TerminalView<W> {
    fn render_idle(&mut self, best: u32, can_resume: bool) {
        let action: &str = if can_resume {
            "resume your game"
        } else {
            "start"
        };
        self.emit(&format!(
            "\nWelcome to Ohmquiz, the Ohm's law quiz!\nBest score: {best} points\n\
             Press Enter to {action}, or type q to quit.\n"
        ));
    }

    fn render_round(&mut self, round: &RoundView, hidden: Category, score: u32) {
        let mut text: String = format!(
            "\nScore: {score}\n{} circuit with {} resistor(s):\n",
            round.topology,
            round.resistors.len()
        );
        for (i, r) in round.resistors.iter().enumerate() {
            let _ = writeln!(text, "  Resistor {}: {}", i + 1, shown(*r, "Ω"));
        }
        if round.current != Shown::Omitted {
            let _ = writeln!(text, "  Current: {}", shown(round.current, "A"));
        }
        if round.voltage != Shown::Omitted {
            let _ = writeln!(text, "  Total voltage: {}", shown(round.voltage, "V"));
        }
        if round.equivalent_resistance != Shown::Omitted {
            let _ = writeln!(
                text,
                "  Equivalent resistance: {}",
                shown(round.equivalent_resistance, "Ω")
            );
        }
        text.push('\n');
        text.push_str(&diagram(round));
        let _ = writeln!(
            text,
            "\nWhat is the {hidden}, in {}? (whole part is enough)",
            hidden.unit()
        );
        self.emit(&text);
    }

    fn request_answer(&mut self) {
        self.emit("> ");
    }

    fn show_feedback(&mut self, message: &str, is_error: bool) {
        if is_error {
            self.emit(&format!("Error: {message}\n"));
        } else {
            self.emit(&format!("{message}\n"));
        }
    }

    fn render_game_over(&mut self, score: u32, best: u32, new_record: bool) {
        let mut text: String = format!("\nGame over! You scored {score} points.\n");
        if new_record {
            text.push_str("New record!\n");
        } else {
            let _ = writeln!(text, "Best score: {best} points");
        }
        text.push_str("Type r to play again, or q to quit.\n");
        self.emit(&text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{Circuit, CircuitError};
    use crate::config::{GameConfig, Profile};
    use crate::round::Round;
    use crate::saver::{MemoryStore, ScoreStore};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::io::Cursor;

    fn output(view: &TerminalView<Vec<u8>>) -> String {
        String::from_utf8_lossy(view.output()).into_owned()
    }

    #[test]
    fn commands_depend_on_the_screen() {
        assert_eq!(parse_command(State::Idle, ""), Command::Start);
        assert_eq!(parse_command(State::Idle, " Start "), Command::Start);
        assert_eq!(
            parse_command(State::Idle, "12"),
            Command::Unknown("12".to_string())
        );
        assert_eq!(
            parse_command(State::InRound, " 12.5 "),
            Command::Answer("12.5".to_string())
        );
        assert_eq!(parse_command(State::InRound, "Q"), Command::Quit);
        assert_eq!(parse_command(State::GameOver, "r"), Command::Restart);
        assert_eq!(
            parse_command(State::GameOver, ""),
            Command::Unknown(String::new())
        );
        assert_eq!(parse_command(State::Exited, "anything"), Command::Quit);
    }

    #[test]
    fn series_diagram() {
        let circuit = Circuit::new(Topology::Series, vec![10.0, 20.0], 1.0).unwrap();
        let round = Round::new(circuit, Category::Resistor(1)).unwrap();
        assert_eq!(diagram(&round.view()), "o---[ 10Ω ]---[ ?Ω ]---o\n");
    }

    #[test]
    fn parallel_diagram() {
        let circuit = Circuit::new(Topology::Parallel, vec![10.0, 5.0], 1.0).unwrap();
        let round = Round::new(circuit, Category::TotalVoltage).unwrap();
        assert_eq!(
            diagram(&round.view()),
            "o---+---[ 10Ω ]---+---o\n    +---[  5Ω ]---+\n"
        );
    }

    #[test]
    fn round_screen_masks_the_question() {
        let circuit = Circuit::new(Topology::Series, vec![10.0, 20.0], 2.0).unwrap();
        let round = Round::new(circuit, Category::TotalVoltage).unwrap();
        let mut view = TerminalView::new(Vec::new());
        view.render_round(&round.view(), round.hidden(), 4);

        let text = output(&view);
        assert!(text.contains("Score: 4"));
        assert!(text.contains("series circuit with 2 resistor(s)"));
        assert!(text.contains("Current: 2A"));
        assert!(text.contains("Total voltage: ?V"));
        assert!(!text.contains("60"));
        assert!(text.contains("What is the total voltage, in V?"));
    }

    #[test]
    fn equivalent_resistance_screen_shows_only_the_network() {
        let circuit = Circuit::new(Topology::Parallel, vec![10.0, 10.0], 1.0).unwrap();
        let round = Round::new(circuit, Category::EquivalentResistance).unwrap();
        let mut view = TerminalView::new(Vec::new());
        view.render_round(&round.view(), round.hidden(), 0);

        let text = output(&view);
        assert!(!text.contains("Current"));
        assert!(!text.contains("Total voltage"));
        assert!(text.contains("Equivalent resistance: ?Ω"));
    }

    #[test]
    fn run_quits_and_saves() {
        let mut session = GameSession::new(
            GameConfig::from_profile(Profile::Practice),
            TerminalView::new(Vec::new()),
            Box::new(MemoryStore::new()),
            StdRng::seed_from_u64(1),
        );
        run(&mut session, Cursor::new("\nabc\nq\nignored\n")).unwrap();

        assert_eq!(session.state(), State::Exited);
        let text = output(session.view());
        assert!(text.contains("Welcome to Ohmquiz"));
        assert!(text.contains("Error: \"abc\" is not a number"));
        assert_eq!(session.store().load_progress().unwrap(), 0);
    }

    #[test]
    fn closing_the_input_exits() {
        let mut session = GameSession::new(
            GameConfig::default(),
            TerminalView::new(Vec::new()),
            Box::new(MemoryStore::new()),
            StdRng::seed_from_u64(1),
        );
        run(&mut session, Cursor::new("")).unwrap();
        assert_eq!(session.state(), State::Exited);
    }

    #[test]
    fn failed_round_still_exits() {
        let mut config = GameConfig::from_profile(Profile::Practice);
        config.min_resistors = 0;
        config.max_resistors = 0;
        config.resistor_questions = false;
        let mut store = MemoryStore::new();
        store.save_progress(3).unwrap();
        let mut session = GameSession::new(
            config,
            TerminalView::new(Vec::new()),
            Box::new(store),
            StdRng::seed_from_u64(1),
        );

        let result = run(&mut session, Cursor::new("\n"));
        assert!(matches!(
            result,
            Err(SessionError::Circuit(CircuitError::Empty))
        ));
        assert_eq!(session.state(), State::Exited);
        assert_eq!(session.store().load_progress().unwrap(), 3);
    }

    #[test]
    fn unknown_commands_are_reported() {
        let mut session = GameSession::new(
            GameConfig::default(),
            TerminalView::new(Vec::new()),
            Box::new(MemoryStore::new()),
            StdRng::seed_from_u64(1),
        );
        run(&mut session, Cursor::new("hello\n")).unwrap();
        assert!(output(session.view()).contains("Error: Unknown command \"hello\"."));
    }
}
