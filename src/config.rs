/*
config.rs

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

//! Game rules.
//!
//! Ohmquiz can be played with two sets of rules, the [`Profile::Classic`] rules and the
//! [`Profile::Practice`] rules. Every rule can also be overridden on the command line (see
//! [`crate::cli_options`]).

use clap::ValueEnum;
use std::ops::RangeInclusive;
use thiserror::Error;

pub const COPYRIGHT_NOTICE: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\nCopyright 2025 Ohmquiz contributors\nLicense GPL-3.0-or-later"
);

/// Largest number of resistors in a circuit.
pub const MAX_RESISTORS: usize = 8;

/// Resistor values, in ohms.
pub const RESISTOR_RANGE: RangeInclusive<u32> = 1..=100;

/// Circuit current, in amperes.
pub const CURRENT_RANGE: RangeInclusive<f64> = 0.1..=5.0;

/// How close an answer must be to the correct value.
///
/// Both values are truncated to integers before the comparison.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum AnswerTolerance {
    /// The answer must be equal to the correct value.
    Exact,

    /// The answer can be off by one.
    WithinOne,
}

impl AnswerTolerance {
    /// Maximum allowed difference between the answer and the correct value.
    pub fn delta(&self) -> i64 {
        match self {
            AnswerTolerance::Exact => 0,
            AnswerTolerance::WithinOne => 1,
        }
    }
}

/// What happens when the player gives a wrong answer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum MissPolicy {
    /// The game ends.
    GameOver,

    /// The player is told whether the answer is too low or too high, and tries again.
    Retry,
}

/// Predefined sets of rules.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, ValueEnum)]
pub enum Profile {
    /// One mistake ends the game, answers are accepted within one unit, and an interrupted game
    /// resumes at startup.
    #[default]
    Classic,

    /// Exact answers with hints on mistakes, and questions about individual resistors.
    Practice,
}

/// Invalid rule combinations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("A circuit needs at least one resistor")]
    NoResistor,
    #[error("The minimum number of resistors ({min}) is greater than the maximum ({max})")]
    InvertedRange { min: usize, max: usize },
    #[error("At most {max} resistors are supported, got {0}", max = MAX_RESISTORS)]
    TooManyResistors(usize),
}

/// Game rules.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub answer_tolerance: AnswerTolerance,
    pub miss_policy: MissPolicy,

    /// Whether an interrupted game restarts immediately, without showing the start screen.
    pub auto_resume: bool,

    pub min_resistors: usize,
    pub max_resistors: usize,

    /// Whether the player can be asked for the value of an individual resistor.
    pub resistor_questions: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_profile(Profile::default())
    }
}

impl GameConfig {
    /// Create a [`GameConfig`] object with the rules of the given profile.
    pub fn from_profile(profile: Profile) -> Self {
        match profile {
            Profile::Classic => Self {
                answer_tolerance: AnswerTolerance::WithinOne,
                miss_policy: MissPolicy::GameOver,
                auto_resume: true,
                min_resistors: 1,
                max_resistors: 4,
                resistor_questions: false,
            },
            Profile::Practice => Self {
                answer_tolerance: AnswerTolerance::Exact,
                miss_policy: MissPolicy::Retry,
                auto_resume: false,
                min_resistors: 2,
                max_resistors: 4,
                resistor_questions: true,
            },
        }
    }

    /// Verify that the rules can produce circuits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_resistors == 0 {
            return Err(ConfigError::NoResistor);
        }
        if self.min_resistors > self.max_resistors {
            return Err(ConfigError::InvertedRange {
                min: self.min_resistors,
                max: self.max_resistors,
            });
        }
        if self.max_resistors > MAX_RESISTORS {
            return Err(ConfigError::TooManyResistors(self.max_resistors));
        }
        Ok(())
    }
}
