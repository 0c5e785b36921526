/*
scores.rs

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

//! Save and restore the scores in the data directory.
//!
//! The best score is saved in `best_score.json`, and the score of the game in progress in
//! `progress.json`.
//! Each file is a serialization of a [`SavedScore`] object in JSON format by using [`serde`].

use log::debug;
use std::fs::{self, File, remove_file};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{ScoreStore, StoreError};

const BEST_SCORE_FILE: &str = "best_score.json";
const PROGRESS_FILE: &str = "progress.json";

/// Content of a score file.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
struct SavedScore {
    score: u32,
}

/// Object to save and restore the scores.
#[derive(Debug)]
pub struct SaverScores {
    /// Absolute path to the best score file.
    best_file: PathBuf,

    /// Absolute path to the file of the game in progress.
    progress_file: PathBuf,
}

impl SaverScores {
    /// Create a [`SaverScores`] object.
    ///
    /// The provided [`PathBuf`] is the path to the directory where the scores must be saved. The
    /// directory is created if it does not exist.
    pub fn open(data_dir: PathBuf) -> Result<Self, StoreError> {
        fs::create_dir_all(&data_dir)?;
        let best_file: PathBuf = data_dir.join(BEST_SCORE_FILE);
        let progress_file: PathBuf = data_dir.join(PROGRESS_FILE);
        debug!("Best score file: {best_file:?}");
        debug!("Progress file: {progress_file:?}");
        Ok(Self {
            best_file,
            progress_file,
        })
    }

    /// Read a score file.
    ///
    /// Return 0 if the file does not exist.
    fn read(path: &Path) -> Result<u32, StoreError> {
        let file: File = match File::open(path) {
            Ok(f) => f,
            Err(error) => match error.kind() {
                ErrorKind::NotFound => return Ok(0),
                _ => return Err(error.into()),
            },
        };
        let reader: BufReader<File> = BufReader::new(file);
        let saved: SavedScore = serde_json::from_reader(reader)?;
        Ok(saved.score)
    }

    /// Write a score file, replacing its previous content.
    fn write(path: &Path, score: u32) -> Result<(), StoreError> {
        let file: File = File::create(path)?;
        let mut writer: BufWriter<File> = BufWriter::new(file);

        serde_json::to_writer(&mut writer, &SavedScore { score })?;
        writer.flush()?;
        Ok(())
    }
}

impl ScoreStore for SaverScores {
    fn load_best(&self) -> Result<u32, StoreError> {
        Self::read(&self.best_file)
    }

    fn save_best(&mut self, score: u32) -> Result<(), StoreError> {
        debug!("Saving best score {score}");
        Self::write(&self.best_file, score)
    }

    fn load_progress(&self) -> Result<u32, StoreError> {
        Self::read(&self.progress_file)
    }

    fn save_progress(&mut self, score: u32) -> Result<(), StoreError> {
        Self::write(&self.progress_file, score)
    }

    fn clear_progress(&mut self) -> Result<(), StoreError> {
        match remove_file(&self.progress_file) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}
