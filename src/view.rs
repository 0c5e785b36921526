/*
view.rs

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

//! Presentation interface.
//!
//! The game session never prints anything itself. It calls a [`GameView`] implementation, such as
//! [`crate::terminal::TerminalView`], to present the screens, and the front end calls back the
//! session with the player's actions.

use crate::questions::Category;
use crate::round::RoundView;

/// Screens and messages that the game session presents to the player.
pub trait GameView {
    /// Show the start screen.
    fn render_idle(&mut self, best: u32, can_resume: bool);

    /// Show a new round with the hidden quantity masked.
    fn render_round(&mut self, round: &RoundView, hidden: Category, score: u32);

    /// Invite the player to type an answer.
    fn request_answer(&mut self);

    /// Show a short message. `is_error` is set for messages about invalid input.
    fn show_feedback(&mut self, message: &str, is_error: bool);

    /// Show the end of game screen.
    fn render_game_over(&mut self, score: u32, best: u32, new_record: bool);
}
