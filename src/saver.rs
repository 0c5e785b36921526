/*
saver.rs

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

//! Save and restore the scores.
//!
//! Two values survive between runs: the best score ever achieved, and the score of the game in
//! progress, so that an interrupted game can be resumed.
//! [`ScoreStore`] is the interface that the game session uses. [`scores::SaverScores`] keeps the
//! values in files, and [`MemoryStore`] keeps them in memory when the files cannot be used.

pub mod scores;

use std::io;

use thiserror::Error;

/// Persistence failures.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Cannot access the score file: {0}")]
    Io(#[from] io::Error),
    #[error("The score file is corrupted: {0}")]
    Format(#[from] serde_json::Error),
}

/// Storage for the best score and the score of the game in progress.
pub trait ScoreStore {
    /// Return the best score, or 0 if none has been saved yet.
    fn load_best(&self) -> Result<u32, StoreError>;

    /// Replace the best score.
    ///
    /// The store does not verify that the value is greater than the previous one.
    fn save_best(&mut self, score: u32) -> Result<(), StoreError>;

    /// Return the score of the interrupted game, or 0 if there is none.
    fn load_progress(&self) -> Result<u32, StoreError>;

    /// Replace the score of the game in progress.
    fn save_progress(&mut self, score: u32) -> Result<(), StoreError>;

    /// Forget the score of the game in progress.
    fn clear_progress(&mut self) -> Result<(), StoreError>;

    /// Whether the values survive the end of the program.
    fn is_durable(&self) -> bool {
        true
    }
}

/// Scores kept in memory only.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    best: Option<u32>,
    progress: Option<u32>,
}

impl MemoryStore {
    /// Create a [`MemoryStore`] object.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn load_best(&self) -> Result<u32, StoreError> {
        Ok(self.best.unwrap_or(0))
    }

    fn save_best(&mut self, score: u32) -> Result<(), StoreError> {
        self.best = Some(score);
        Ok(())
    }

    fn load_progress(&self) -> Result<u32, StoreError> {
        Ok(self.progress.unwrap_or(0))
    }

    fn save_progress(&mut self, score: u32) -> Result<(), StoreError> {
        self.progress = Some(score);
        Ok(())
    }

    fn clear_progress(&mut self) -> Result<(), StoreError> {
        self.progress = None;
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }
}
