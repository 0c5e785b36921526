/*
cli_options.rs

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

//! Process command-line options.
//!
//! The options select the rules of the game. A profile provides a complete set of rules, and the
//! other options override individual rules of that profile.
//!
//! # Examples
//!
//! Play with the classic rules, keeping the scores in `~/.local/share/ohmquiz`:
//!
//! ```text
//! $ ohmquiz --data-dir ~/.local/share/ohmquiz
//! ```
//!
//! Practice with exact answers but end the game on the first mistake:
//!
//! ```text
//! $ ohmquiz -p practice -m game-over
//! ```

use clap::Parser;
use log::{LevelFilter, debug};
use std::path::PathBuf;

use crate::config::{
    AnswerTolerance, COPYRIGHT_NOTICE, ConfigError, GameConfig, MissPolicy, Profile,
};

/// Ohm's law quiz: compute the hidden quantity of random resistor circuits.
#[derive(Parser, Debug)]
#[command(about, long_about = None, version, long_version = COPYRIGHT_NOTICE)]
struct Args {
    /// Set of rules
    #[arg(value_enum, short, long, default_value_t = Profile::Classic)]
    profile: Profile,

    /// How close the answer must be to the correct value
    #[arg(value_enum, short, long)]
    tolerance: Option<AnswerTolerance>,

    /// What happens after a wrong answer
    #[arg(value_enum, short, long)]
    miss: Option<MissPolicy>,

    /// Resume an interrupted game without showing the start screen
    #[arg(long, conflicts_with = "no_auto_resume")]
    auto_resume: bool,

    /// Always show the start screen
    #[arg(long)]
    no_auto_resume: bool,

    /// Minimum number of resistors in a circuit
    #[arg(long)]
    min_resistors: Option<usize>,

    /// Maximum number of resistors in a circuit
    #[arg(long)]
    max_resistors: Option<usize>,

    /// Also ask for the value of individual resistors
    #[arg(long, conflicts_with = "no_resistor_questions")]
    resistor_questions: bool,

    /// Never ask for the value of individual resistors
    #[arg(long)]
    no_resistor_questions: bool,

    /// Directory where the scores are saved
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Seed for the random circuits, to replay the same questions
    #[arg(long)]
    seed: Option<u64>,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

/// Settings for a run of the game.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub config: GameConfig,
    pub data_dir: PathBuf,
    pub seed: Option<u64>,
}

impl Args {
    /// Build the game rules from the profile and the individual overrides.
    fn into_options(self) -> Result<Options, ConfigError> {
        let mut config: GameConfig = GameConfig::from_profile(self.profile);

        if let Some(t) = self.tolerance {
            config.answer_tolerance = t;
        }
        if let Some(m) = self.miss {
            config.miss_policy = m;
        }
        if self.auto_resume {
            config.auto_resume = true;
        }
        if self.no_auto_resume {
            config.auto_resume = false;
        }
        if let Some(n) = self.min_resistors {
            config.min_resistors = n;
        }
        if let Some(n) = self.max_resistors {
            config.max_resistors = n;
        }
        if self.resistor_questions {
            config.resistor_questions = true;
        }
        if self.no_resistor_questions {
            config.resistor_questions = false;
        }
        config.validate()?;

        Ok(Options {
            config,
            data_dir: self.data_dir,
            seed: self.seed,
        })
    }
}

/// Initialize the logger. `RUST_LOG` is honored, and `debug` forces the debug level.
fn init_logging(debug: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if debug {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

/// Parse and process command-line options.
///
/// Clap exits the program on `--help`, `--version`, and invalid options.
pub fn parse() -> Result<Options, ConfigError> {
    let args: Args = Args::parse();
    init_logging(args.debug);

    let options: Options = args.into_options()?;
    debug!("Options: {options:?}");
    Ok(options)
}
