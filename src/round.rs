/*
round.rs

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

//! Generate and grade rounds.
//!
//! A [`Round`] is a random [`Circuit`] with one hidden quantity. [`RoundGenerator`] builds the
//! circuit and asks its [`QuestionRotation`] which quantity to hide, and the round grades the
//! player's answer against the value computed from the circuit.

use log::debug;
use std::cmp::Ordering;

use rand::Rng;
use thiserror::Error;

use crate::circuit::{Circuit, CircuitError, Topology, round2};
use crate::config::{AnswerTolerance, CURRENT_RANGE, GameConfig, RESISTOR_RANGE};
use crate::questions::{Category, QuestionRotation};

/// Answers that cannot be graded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnswerError {
    #[error("\"{0}\" is not a number. Enter a numeric value.")]
    NotANumber(String),
}

/// Result of grading an answer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    TooLow,
    TooHigh,
}

/// Parse the text that the player typed.
///
/// Surrounding whitespace is ignored. Infinite and NaN values are refused.
pub fn parse_answer(raw: &str) -> Result<f64, AnswerError> {
    let text: &str = raw.trim();
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(AnswerError::NotANumber(text.to_string())),
    }
}

/// How a quantity is presented to the player.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Shown {
    /// The value is given.
    Value(f64),

    /// The value is the question ("?").
    Hidden,

    /// The quantity is not displayed at all.
    Omitted,
}

/// Description of a round with the hidden quantity masked.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundView {
    pub topology: Topology,
    pub resistors: Vec<Shown>,
    pub current: Shown,
    pub voltage: Shown,
    pub equivalent_resistance: Shown,
}

/// A circuit and the quantity that the player must compute.
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    circuit: Circuit,
    hidden: Category,

    /// Value of the hidden quantity.
    answer: f64,
}

impl Round {
    /// Create a [`Round`] object that hides the given quantity of the circuit.
    pub fn new(circuit: Circuit, hidden: Category) -> Result<Self, CircuitError> {
        let answer: f64 = match hidden {
            Category::TotalVoltage => circuit.total_voltage(),
            Category::TotalCurrent => circuit.current(),
            Category::EquivalentResistance => circuit.equivalent_resistance(),
            Category::Resistor(i) => circuit
                .resistor(i)
                .ok_or(CircuitError::NoSuchResistor(i))?,
        };
        Ok(Self {
            circuit,
            hidden,
            answer,
        })
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn hidden(&self) -> Category {
        self.hidden
    }

    pub fn answer(&self) -> f64 {
        self.answer
    }

    /// Return the round description with the hidden quantity masked.
    ///
    /// When the equivalent resistance is asked, only the resistor network is shown: the current
    /// and the voltage would otherwise give the answer away.
    pub fn view(&self) -> RoundView {
        let resistors: Vec<Shown> = self
            .circuit
            .resistors()
            .iter()
            .enumerate()
            .map(|(i, r)| {
                if self.hidden == Category::Resistor(i) {
                    Shown::Hidden
                } else {
                    Shown::Value(*r)
                }
            })
            .collect();

        let (current, voltage, equivalent_resistance) = match self.hidden {
            Category::EquivalentResistance => (Shown::Omitted, Shown::Omitted, Shown::Hidden),
            Category::TotalCurrent => (
                Shown::Hidden,
                Shown::Value(self.circuit.total_voltage()),
                Shown::Omitted,
            ),
            Category::TotalVoltage => (
                Shown::Value(self.circuit.current()),
                Shown::Hidden,
                Shown::Omitted,
            ),
            Category::Resistor(_) => (
                Shown::Value(self.circuit.current()),
                Shown::Value(self.circuit.total_voltage()),
                Shown::Omitted,
            ),
        };

        RoundView {
            topology: self.circuit.topology(),
            resistors,
            current,
            voltage,
            equivalent_resistance,
        }
    }

    /// Grade the text that the player typed.
    ///
    /// The answer and the correct value are both truncated to integers, and then compared with
    /// the given tolerance.
    pub fn check(&self, raw: &str, tolerance: AnswerTolerance) -> Result<Verdict, AnswerError> {
        // Kept as floats: the answer may exceed the range of i64
        let given: f64 = parse_answer(raw)?.trunc();
        let expected: f64 = self.answer.trunc();

        debug!("Answer {given}, expected {expected} ({tolerance:?})");
        if (given - expected).abs() <= tolerance.delta() as f64 {
            return Ok(Verdict::Correct);
        }
        Ok(match given.total_cmp(&expected) {
            Ordering::Less => Verdict::TooLow,
            _ => Verdict::TooHigh,
        })
    }
}

/// Build random rounds.
#[derive(Debug, Clone)]
pub struct RoundGenerator {
    min_resistors: usize,
    max_resistors: usize,
    rotation: QuestionRotation,
}

impl RoundGenerator {
    /// Create a [`RoundGenerator`] object for the given rules.
    pub fn new(config: &GameConfig) -> Self {
        let resistor_positions: usize = if config.resistor_questions {
            config.max_resistors
        } else {
            0
        };
        Self {
            min_resistors: config.min_resistors,
            max_resistors: config.max_resistors,
            rotation: QuestionRotation::new(resistor_positions),
        }
    }

    /// Start a new question cycle.
    pub fn reset_rotation(&mut self) {
        self.rotation.reset();
    }

    pub fn rotation(&self) -> &QuestionRotation {
        &self.rotation
    }

    /// Generate a random round.
    ///
    /// # Errors
    ///
    /// The method only fails if the configured resistor range allows empty circuits, which
    /// [`GameConfig::validate`] prevents, or if [`Topology::COUNT`] does not match the
    /// topologies.
    pub fn generate<R: Rng>(&mut self, rng: &mut R) -> Result<Round, CircuitError> {
        let count: usize = rng.random_range(self.min_resistors..=self.max_resistors);
        let resistors: Vec<f64> = (0..count)
            .map(|_| f64::from(rng.random_range(RESISTOR_RANGE)))
            .collect();
        let current: f64 = round2(rng.random_range(CURRENT_RANGE));
        let topology_index: u8 = rng.random_range(0..Topology::COUNT);
        let topology: Topology = Topology::from_repr(topology_index)
            .ok_or(CircuitError::UnknownTopology(topology_index))?;

        let circuit: Circuit = Circuit::new(topology, resistors, current)?;
        let hidden: Category = self.rotation.next(rng, circuit.resistors().len());
        let round: Round = Round::new(circuit, hidden)?;
        debug!(
            "New round: {} circuit {:?}, {}A, hidden {} = {}",
            round.circuit.topology(),
            round.circuit.resistors(),
            round.circuit.current(),
            round.hidden,
            round.answer
        );
        Ok(round)
    }
}
