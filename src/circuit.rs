/*
circuit.rs

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

//! Resistor network model.
//!
//! A [`Circuit`] is a list of resistors wired in series or in parallel, with the current that
//! flows through the whole network.
//! The equivalent resistance and the total voltage are always computed from these values, so they
//! cannot get out of sync with the resistors.

use std::fmt;

use strum_macros::FromRepr;
use thiserror::Error;

/// How the resistors are wired.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, FromRepr)]
#[repr(u8)]
pub enum Topology {
    Series,
    Parallel,
}

impl Topology {
    /// Number of topologies, used to pick one at random with [`Topology::from_repr`].
    pub const COUNT: u8 = 2;
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Topology::Series => write!(f, "series"),
            Topology::Parallel => write!(f, "parallel"),
        }
    }
}

/// Violations of the [`Circuit`] construction rules.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CircuitError {
    #[error("A circuit needs at least one resistor")]
    Empty,
    #[error("Resistor {index} has an invalid value: {value}")]
    InvalidResistor { index: usize, value: f64 },
    #[error("Invalid current: {0}")]
    InvalidCurrent(f64),
    #[error("The circuit has no resistor at position {0}")]
    NoSuchResistor(usize),
    #[error("No topology has the number {0}")]
    UnknownTopology(u8),
}

/// Round a value to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Resistor network.
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    /// Wiring of the resistors.
    topology: Topology,

    /// Resistor values in ohms, in the order they are drawn.
    resistors: Vec<f64>,

    /// Current through the network in amperes, rounded to two decimals.
    current: f64,
}

impl Circuit {
    /// Create a [`Circuit`] object.
    ///
    /// # Errors
    ///
    /// The resistor list must not be empty, every resistor must be strictly positive (a zero
    /// resistor would make the parallel formula divide by zero), and the current must be strictly
    /// positive.
    pub fn new(
        topology: Topology,
        resistors: Vec<f64>,
        current: f64,
    ) -> Result<Self, CircuitError> {
        if resistors.is_empty() {
            return Err(CircuitError::Empty);
        }
        if let Some((index, value)) = resistors
            .iter()
            .enumerate()
            .find(|(_, r)| !r.is_finite() || **r <= 0.0)
        {
            return Err(CircuitError::InvalidResistor {
                index,
                value: *value,
            });
        }
        if !current.is_finite() || current <= 0.0 {
            return Err(CircuitError::InvalidCurrent(current));
        }
        Ok(Self {
            topology,
            resistors,
            current: round2(current),
        })
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn resistors(&self) -> &[f64] {
        &self.resistors
    }

    /// Return the value of the resistor at the given position, or None if there is no such
    /// resistor.
    pub fn resistor(&self, index: usize) -> Option<f64> {
        self.resistors.get(index).copied()
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    /// Return the equivalent resistance of the network, rounded to two decimals.
    pub fn equivalent_resistance(&self) -> f64 {
        match self.topology {
            Topology::Series => round2(self.resistors.iter().sum()),
            Topology::Parallel => {
                round2(1.0 / self.resistors.iter().map(|r| 1.0 / r).sum::<f64>())
            }
        }
    }

    /// Return the voltage across the whole network, rounded to two decimals.
    pub fn total_voltage(&self) -> f64 {
        round2(self.current * self.equivalent_resistance())
    }
}
