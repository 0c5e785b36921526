/*
main.rs

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

mod circuit;
mod cli_options;
mod config;
mod questions;
mod round;
mod saver;
mod session;
mod terminal;
mod view;

use log::{error, info, warn};
use std::io;
use std::process::ExitCode;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::saver::scores::SaverScores;
use crate::saver::{MemoryStore, ScoreStore};
use crate::session::GameSession;
use crate::terminal::TerminalView;

fn main() -> ExitCode {
    let options: cli_options::Options = match cli_options::parse() {
        Ok(o) => o,
        Err(error) => {
            eprintln!("ohmquiz: {error}");
            return ExitCode::from(2);
        }
    };

    // Without a usable data directory the game is still playable, but the scores are lost on exit
    let store: Box<dyn ScoreStore> = match SaverScores::open(options.data_dir.clone()) {
        Ok(s) => Box::new(s),
        Err(error) => {
            warn!("Cannot use the data directory {:?}: {error}", options.data_dir);
            Box::new(MemoryStore::new())
        }
    };

    let rng: StdRng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut session: GameSession<TerminalView<io::Stdout>> =
        GameSession::new(options.config, TerminalView::new(io::stdout()), store, rng);

    match terminal::run(&mut session, io::stdin().lock()) {
        Ok(()) => {
            info!(
                "Session ended with score {} (best {})",
                session.score(),
                session.best()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            eprintln!("ohmquiz: {err}");
            ExitCode::FAILURE
        }
    }
}
