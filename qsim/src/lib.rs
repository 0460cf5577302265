// qsim - numerical core for an interactive 2D quantum wavefunction simulator
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Numerical core of an interactive 2D quantum wavefunction simulator.
//!
//! Evolves a complex scalar field ψ(x,y,t) on a periodic grid under
//! the time-dependent Schrödinger equation via split-operator
//! (Strang) time stepping, supports Born-rule projective measurement
//! with a Gaussian detector response, and builds configurable
//! potential-energy landscapes (analytic families and freehand
//! painting). [`Session`] is the single entry point; everything else
//! is an internal building block it composes.
//!
//! This crate has no I/O, no UI, and no async runtime: it is driven
//! synchronously by a host application (see `qsim-wasm` for a
//! JavaScript-facing binding layer).

pub mod complex_field;
pub mod engine;
pub mod error;
pub mod fft;
pub(crate) mod grid;
pub mod initial_state;
pub mod measurement;
pub mod operators;
pub mod params;
pub mod potential;
pub mod rng;
pub mod session;

pub use complex_field::ComplexField;
pub use error::Error;
pub use measurement::MeasurementOutcome;
pub use params::SessionParameters;
pub use potential::PotentialType;
pub use rng::{Pcg32Source, UniformSource};
pub use session::Session;
