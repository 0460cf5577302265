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

use std::fmt;

/// Represents all possible errors that can occur in this crate.
///
/// Construction-time errors (`InvalidDimension`, `InvalidParameter`,
/// `InvalidFftSize`) propagate to the caller. The remaining variants
/// are internal correctness checks that should never surface from a
/// released build; they exist so that a bug trips a typed error
/// instead of an out-of-bounds panic deep inside a hot loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Error {
    /// A grid dimension was not a power of two `>= 2`.
    InvalidDimension {
        /// Which dimension was invalid (`"Nx"` or `"Ny"`).
        dim: &'static str,
        /// The offending value.
        value: usize,
    },

    /// A scalar session parameter was non-positive or non-finite.
    InvalidParameter {
        /// Name of the offending parameter (e.g. `"dx"`, `"dt"`).
        name: &'static str,
        /// The offending value.
        value: f64,
    },

    /// An FFT plan was requested for a size that is not a power of
    /// two `>= 2`.
    InvalidFftSize {
        /// The offending size.
        size: usize,
    },

    /// A cell index was outside the bounds of the field it was used
    /// to address.
    IndexOutOfRange {
        /// Column index that was requested.
        i: usize,
        /// Row index that was requested.
        j: usize,
        /// Field width.
        nx: usize,
        /// Field height.
        ny: usize,
    },

    /// A `copy_from` was attempted between fields of different shape.
    ShapeMismatch {
        /// `(Nx, Ny)` of the destination field.
        expected: (usize, usize),
        /// `(Nx, Ny)` of the source field.
        found: (usize, usize),
    },

    /// `normalize` was called on a field whose total probability is
    /// zero (or negative, which cannot happen short of a bug, but is
    /// guarded against anyway).
    DegenerateField,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimension { dim, value } => write!(
                f,
                "{dim} must be a power of two and at least 2, got {value}"
            ),
            Self::InvalidParameter { name, value } => write!(
                f,
                "{name} must be a positive finite number, got {value}"
            ),
            Self::InvalidFftSize { size } => write!(
                f,
                "FFT size must be a power of two and at least 2, got {size}"
            ),
            Self::IndexOutOfRange { i, j, nx, ny } => write!(
                f,
                "cell ({i}, {j}) is out of range for a {nx}x{ny} field"
            ),
            Self::ShapeMismatch { expected, found } => write!(
                f,
                "shape mismatch: expected {}x{}, found {}x{}",
                expected.0, expected.1, found.0, found.1
            ),
            Self::DegenerateField => write!(
                f,
                "field has zero total probability and cannot be normalized"
            ),
        }
    }
}

impl std::error::Error for Error {}
