/*
questions.rs

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

//! Rotate through the question categories.
//!
//! Each round hides one quantity of the circuit. [`QuestionRotation`] draws that quantity at
//! random, but never twice in the same cycle: a category is removed when it is drawn, and the
//! list is refilled only when it is exhausted.

use log::debug;
use std::fmt;

use rand::Rng;

/// Quantity that the player must compute.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    TotalVoltage,
    TotalCurrent,
    EquivalentResistance,

    /// Value of the resistor at the given position (starting at 0).
    Resistor(usize),
}

impl Category {
    /// Categories that apply to every circuit.
    pub const BASE: [Category; 3] = [
        Category::TotalVoltage,
        Category::TotalCurrent,
        Category::EquivalentResistance,
    ];

    /// Whether the category can be asked for a circuit with the given number of resistors.
    pub fn applies_to(&self, resistor_count: usize) -> bool {
        match self {
            Category::Resistor(i) => *i < resistor_count,
            _ => true,
        }
    }

    /// Unit symbol of the quantity.
    pub fn unit(&self) -> &'static str {
        match self {
            Category::TotalVoltage => "V",
            Category::TotalCurrent => "A",
            Category::EquivalentResistance | Category::Resistor(_) => "Ω",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Category::TotalVoltage => write!(f, "total voltage"),
            Category::TotalCurrent => write!(f, "total current"),
            Category::EquivalentResistance => write!(f, "equivalent resistance"),
            Category::Resistor(i) => write!(f, "resistor {}", i + 1),
        }
    }
}

/// Categories not yet asked in the current cycle.
#[derive(Debug, Clone)]
pub struct QuestionRotation {
    /// Every category of a cycle.
    full: Vec<Category>,

    /// Categories still available in the current cycle.
    available: Vec<Category>,
}

impl QuestionRotation {
    /// Create a [`QuestionRotation`] object.
    ///
    /// When `max_resistors` is not zero, the cycle also includes one [`Category::Resistor`]
    /// category per resistor position.
    pub fn new(max_resistors: usize) -> Self {
        let mut full: Vec<Category> = Category::BASE.to_vec();
        full.extend((0..max_resistors).map(Category::Resistor));
        Self {
            available: full.clone(),
            full,
        }
    }

    /// Start a new cycle.
    pub fn reset(&mut self) {
        self.available = self.full.clone();
    }

    /// Return the categories still available in the current cycle.
    pub fn remaining(&self) -> &[Category] {
        &self.available
    }

    /// Draw the next category for a circuit with `resistor_count` resistors.
    ///
    /// The category is chosen uniformly among the available categories that apply to the circuit.
    /// If there are none (the cycle is exhausted, or only resistor positions that the circuit does
    /// not have are left), then a new cycle starts before drawing.
    pub fn next<R: Rng>(&mut self, rng: &mut R, resistor_count: usize) -> Category {
        let mut candidates: Vec<usize> = self.candidates(resistor_count);
        if candidates.is_empty() {
            debug!("Question cycle exhausted, starting a new one");
            self.reset();
            candidates = self.candidates(resistor_count);
        }

        // The base categories always apply, so the list cannot be empty after a reset
        let pick: usize = candidates[rng.random_range(0..candidates.len())];
        let category: Category = self.available.remove(pick);
        debug!("Next question: {category}, {} left", self.available.len());
        category
    }

    /// Indexes in the available list of the categories that apply to the circuit.
    fn candidates(&self, resistor_count: usize) -> Vec<usize> {
        self.available
            .iter()
            .enumerate()
            .filter(|(_, c)| c.applies_to(resistor_count))
            .map(|(i, _)| i)
            .collect()
    }
}
