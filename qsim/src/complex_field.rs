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

//! Dense 2D complex scalar field with interleaved real/imaginary storage.

use num_complex::Complex64;

use crate::error::Error;

/// A dense 2D field of complex numbers stored as a single flat buffer
/// of `2 * Nx * Ny` doubles, channel-interleaved in row-major cell
/// order: the element at column `i`, row `j` occupies buffer indices
/// `2*(j*Nx + i)` (real) and `2*(j*Nx + i) + 1` (imaginary).
///
/// This is the primary representation the FFT kernels and the
/// split-step operators consume directly; [`Complex64`] is only used
/// at the edges of the API as an ergonomic, allocation-free view of a
/// single cell.
#[derive(Clone, Debug, PartialEq)]
pub struct ComplexField {
    nx: usize,
    ny: usize,
    data: Vec<f64>,
}

impl ComplexField {
    /// Creates a new field of shape `(nx, ny)`, initialized to zero.
    pub fn new(nx: usize, ny: usize) -> Result<Self, Error> {
        if nx == 0 {
            return Err(Error::InvalidDimension { dim: "Nx", value: nx });
        }
        if ny == 0 {
            return Err(Error::InvalidDimension { dim: "Ny", value: ny });
        }
        Ok(Self {
            nx,
            ny,
            data: vec![0.0; 2 * nx * ny],
        })
    }

    /// Width of the field in cells.
    #[inline]
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Height of the field in cells.
    #[inline]
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// `(Nx, Ny)` as a pair, for shape comparisons.
    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    /// Raw interleaved buffer, read-only. Exposed for the FFT kernels
    /// and operator builders, which must bypass per-cell bounds
    /// checks on the hot path.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Raw interleaved buffer, mutable. See [`ComplexField::as_slice`].
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    #[inline]
    fn checked_index(&self, i: usize, j: usize) -> Result<usize, Error> {
        if i >= self.nx || j >= self.ny {
            return Err(Error::IndexOutOfRange {
                i,
                j,
                nx: self.nx,
                ny: self.ny,
            });
        }
        Ok(2 * (j * self.nx + i))
    }

    /// Index into the raw buffer of the real channel at `(i, j)`,
    /// without bounds checks. Callers must have already validated
    /// `i < nx` and `j < ny` (e.g. because they are iterating the
    /// grid themselves).
    #[inline(always)]
    pub fn raw_index(&self, i: usize, j: usize) -> usize {
        2 * (j * self.nx + i)
    }

    /// Real part at `(i, j)`.
    pub fn re(&self, i: usize, j: usize) -> Result<f64, Error> {
        Ok(self.data[self.checked_index(i, j)?])
    }

    /// Imaginary part at `(i, j)`.
    pub fn im(&self, i: usize, j: usize) -> Result<f64, Error> {
        Ok(self.data[self.checked_index(i, j)? + 1])
    }

    /// Both channels at `(i, j)` as a [`Complex64`].
    pub fn get(&self, i: usize, j: usize) -> Result<Complex64, Error> {
        let k = self.checked_index(i, j)?;
        Ok(Complex64::new(self.data[k], self.data[k + 1]))
    }

    /// Overwrites both channels at `(i, j)`.
    pub fn set(&mut self, i: usize, j: usize, value: Complex64) -> Result<(), Error> {
        let k = self.checked_index(i, j)?;
        self.data[k] = value.re;
        self.data[k + 1] = value.im;
        Ok(())
    }

    /// Squared magnitude `re^2 + im^2` at `(i, j)`, i.e. the
    /// unnormalized per-cell probability.
    pub fn magnitude2(&self, i: usize, j: usize) -> Result<f64, Error> {
        let k = self.checked_index(i, j)?;
        let (re, im) = (self.data[k], self.data[k + 1]);
        Ok(re * re + im * im)
    }

    /// Magnitude `sqrt(re^2 + im^2)` at `(i, j)`.
    pub fn magnitude(&self, i: usize, j: usize) -> Result<f64, Error> {
        Ok(self.magnitude2(i, j)?.sqrt())
    }

    /// Phase `atan2(im, re)` at `(i, j)`, in `[-pi, pi]`.
    pub fn phase(&self, i: usize, j: usize) -> Result<f64, Error> {
        let k = self.checked_index(i, j)?;
        Ok(self.data[k + 1].atan2(self.data[k]))
    }

    /// Zeroes a single cell.
    pub fn zero_cell(&mut self, i: usize, j: usize) -> Result<(), Error> {
        let k = self.checked_index(i, j)?;
        self.data[k] = 0.0;
        self.data[k + 1] = 0.0;
        Ok(())
    }

    /// Zeroes the entire field.
    pub fn zero(&mut self) {
        self.data.iter_mut().for_each(|x| *x = 0.0);
    }

    /// Scales every cell in place by a real scalar.
    pub fn scale(&mut self, s: f64) {
        self.data.iter_mut().for_each(|x| *x *= s);
    }

    /// Copies the contents of `other` into `self`. Both fields must
    /// have identical shape.
    pub fn copy_from(&mut self, other: &ComplexField) -> Result<(), Error> {
        if self.dims() != other.dims() {
            return Err(Error::ShapeMismatch {
                expected: self.dims(),
                found: other.dims(),
            });
        }
        self.data.copy_from_slice(&other.data);
        Ok(())
    }

    /// `Sum_{i,j} (re(i,j)^2 + im(i,j)^2)`, the discrete total
    /// probability under the sum-normalization convention (see
    /// [`normalize`]).
    pub fn sum_abs2(&self) -> f64 {
        self.data.iter().map(|x| x * x).sum()
    }

    /// Multiplies `self` pointwise by `other`, treating each cell as a
    /// complex number (used to apply a diagonal operator such as
    /// `U_T` or `U_V_half`). Both fields must have identical shape.
    pub fn multiply_complex(&mut self, other: &ComplexField) -> Result<(), Error> {
        if self.dims() != other.dims() {
            return Err(Error::ShapeMismatch {
                expected: self.dims(),
                found: other.dims(),
            });
        }
        for (a, b) in self.data.chunks_exact_mut(2).zip(other.data.chunks_exact(2)) {
            let (are, aim) = (a[0], a[1]);
            let (bre, bim) = (b[0], b[1]);
            a[0] = are * bre - aim * bim;
            a[1] = are * bim + aim * bre;
        }
        Ok(())
    }

    /// Multiplies `self` pointwise by a real-valued field of length
    /// `Nx * Ny` in the same row-major cell order as [`ComplexField`]
    /// (used by the detector response and the freehand-attenuation
    /// envelope, both of which scale amplitude by a real number per
    /// cell rather than apply a complex phase).
    pub fn multiply_real(&mut self, real_field: &[f64]) -> Result<(), Error> {
        if real_field.len() != self.nx * self.ny {
            return Err(Error::ShapeMismatch {
                expected: self.dims(),
                found: (real_field.len(), 1),
            });
        }
        for (cell, &factor) in self.data.chunks_exact_mut(2).zip(real_field.iter()) {
            cell[0] *= factor;
            cell[1] *= factor;
        }
        Ok(())
    }
}

/// Rescales `field` in place so that `sum_abs2() == 1`, the
/// sum-normalization convention this crate uses throughout (as
/// opposed to the continuous `Integral |psi|^2 dA == 1` convention;
/// the two are related by a factor of `dx^2`).
pub fn normalize(field: &mut ComplexField) -> Result<(), Error> {
    let s = field.sum_abs2();
    if !(s > 0.0) {
        return Err(Error::DegenerateField);
    }
    field.scale(1.0 / s.sqrt());
    Ok(())
}
