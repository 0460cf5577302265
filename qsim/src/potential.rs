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

//! The real scalar potential field `V(x,y)` and the analytic families
//! and freehand brush that populate it.

use crate::error::Error;
use crate::grid::min_image_distance;

/// Analytic potential families, plus `Freehand` for the
/// brush-painted case where [`build`] is a no-op and `V` is instead
/// the accumulated result of [`add_brush_stroke`] calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PotentialType {
    /// `V == 0` everywhere.
    None,
    /// A single attractive Gaussian well at the domain center.
    Single,
    /// Two attractive Gaussian wells arranged vertically.
    Double,
    /// A sinusoidal potential with three full periods along `y`.
    Sinusoid,
    /// A harmonic (quadratic) well at the domain center.
    Quadratic,
    /// User-painted, accumulated via brush strokes.
    Freehand,
}

/// Dense real scalar field `V(x,y)`, stored as `Nx * Ny` doubles in
/// the same row-major cell order as [`crate::complex_field::ComplexField`]
/// (unlike `ComplexField`, there is no interleaving: these are bare
/// scalars).
#[derive(Clone, Debug, PartialEq)]
pub struct PotentialField {
    nx: usize,
    ny: usize,
    data: Vec<f64>,
}

impl PotentialField {
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
            data: vec![0.0; nx * ny],
        })
    }

    /// `(Nx, Ny)`.
    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    /// Raw row-major buffer, read-only.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    fn checked_index(&self, i: usize, j: usize) -> Result<usize, Error> {
        if i >= self.nx || j >= self.ny {
            return Err(Error::IndexOutOfRange {
                i,
                j,
                nx: self.nx,
                ny: self.ny,
            });
        }
        Ok(j * self.nx + i)
    }

    /// Value at cell `(i, j)`.
    pub fn get(&self, i: usize, j: usize) -> Result<f64, Error> {
        Ok(self.data[self.checked_index(i, j)?])
    }

    /// Zeroes every cell.
    pub fn zero(&mut self) {
        self.data.iter_mut().for_each(|v| *v = 0.0);
    }

    #[inline(always)]
    fn add_raw(&mut self, i: usize, j: usize, delta: f64) {
        self.data[j * self.nx + i] += delta;
    }

    #[inline(always)]
    fn set_raw(&mut self, i: usize, j: usize, value: f64) {
        self.data[j * self.nx + i] = value;
    }
}

/// Evaluates one of the analytic potential families (or zeroes the
/// field, for `None`) and scales every cell by `strength_scale`. For
/// [`PotentialType::Freehand`] this is a no-op: freehand potentials
/// are never rebuilt from a formula, only accumulated via
/// [`add_brush_stroke`].
pub fn build(
    field: &mut PotentialField,
    variant: PotentialType,
    dx: f64,
    v0: f64,
    strength_scale: f64,
    sigma_v: f64,
) {
    let (nx, ny) = field.dims();
    let length_x = nx as f64 * dx;
    let length_y = ny as f64 * dx;

    if variant == PotentialType::Freehand {
        return;
    }

    for j in 0..ny {
        let y = j as f64 * dx;
        for i in 0..nx {
            let x = i as f64 * dx;
            let raw = match variant {
                PotentialType::None => 0.0,
                PotentialType::Single => {
                    let r = min_image_distance(x, y, length_x / 2.0, length_y / 2.0, length_x, length_y);
                    -v0 * (-r * r / (2.0 * sigma_v * sigma_v)).exp()
                }
                PotentialType::Double => {
                    let sigma_p = sigma_v / 3.0;
                    let r1 = min_image_distance(x, y, length_x / 2.0, length_y / 3.0, length_x, length_y);
                    let r2 =
                        min_image_distance(x, y, length_x / 2.0, 2.0 * length_y / 3.0, length_x, length_y);
                    let denom = 2.0 * sigma_p * sigma_p;
                    -v0 * ((-r1 * r1 / denom).exp() + (-r2 * r2 / denom).exp())
                }
                PotentialType::Sinusoid => -v0 * (6.0 * std::f64::consts::PI * y / length_y).cos(),
                PotentialType::Quadratic => {
                    let r = min_image_distance(x, y, length_x / 2.0, length_y / 2.0, length_x, length_y);
                    (v0 / (2.0 * sigma_v * sigma_v)) * r * r
                }
                PotentialType::Freehand => unreachable!("handled above"),
            };
            field.set_raw(i, j, raw * strength_scale);
        }
    }
}

/// Additively deposits a Gaussian bump of signed strength `delta_v`
/// and physical radius `sigma_brush` centered at cell `(gx, gy)`. Only
/// cells within a `3*sigma_brush` box (in physical units) of the
/// center are touched, matching the locality a freehand brush stroke
/// is expected to have.
pub fn add_brush_stroke(
    field: &mut PotentialField,
    dx: f64,
    gx: usize,
    gy: usize,
    delta_v: f64,
    sigma_brush: f64,
) -> Result<(), Error> {
    let (nx, ny) = field.dims();
    if gx >= nx {
        return Err(Error::IndexOutOfRange { i: gx, j: gy, nx, ny });
    }
    if gy >= ny {
        return Err(Error::IndexOutOfRange { i: gx, j: gy, nx, ny });
    }
    let length_x = nx as f64 * dx;
    let length_y = ny as f64 * dx;
    let center_x = gx as f64 * dx;
    let center_y = gy as f64 * dx;
    let radius_cells = ((3.0 * sigma_brush) / dx).ceil() as i64;
    let denom = 2.0 * sigma_brush * sigma_brush;

    for dj in -radius_cells..=radius_cells {
        let j = wrap_index(gy as i64 + dj, ny);
        let y = j as f64 * dx;
        for di in -radius_cells..=radius_cells {
            let i = wrap_index(gx as i64 + di, nx);
            let x = i as f64 * dx;
            let r = min_image_distance(x, y, center_x, center_y, length_x, length_y);
            field.add_raw(i, j, delta_v * (-r * r / denom).exp());
        }
    }
    Ok(())
}

#[inline(always)]
fn wrap_index(i: i64, n: usize) -> usize {
    let n = n as i64;
    (((i % n) + n) % n) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_variant_is_zero_everywhere() {
        let mut field = PotentialField::new(8, 8).unwrap();
        build(&mut field, PotentialType::None, 1.0, 5.0, 1.0, 2.0);
        for v in field.as_slice() {
            assert_eq!(*v, 0.0);
        }
    }

    #[test]
    fn single_well_is_deepest_at_center() {
        let (nx, ny) = (16, 16);
        let dx = 10.0 / nx as f64;
        let mut field = PotentialField::new(nx, ny).unwrap();
        build(&mut field, PotentialType::Single, dx, 1.0, 1.0, 2.0);
        let center = field.get(nx / 2, ny / 2).unwrap();
        let corner = field.get(0, 0).unwrap();
        assert!(center < corner);
        assert!(center < 0.0);
    }

    #[test]
    fn freehand_build_is_a_no_op() {
        let mut field = PotentialField::new(4, 4).unwrap();
        field.set_raw(1, 1, 42.0);
        build(&mut field, PotentialType::Freehand, 1.0, 5.0, 2.0, 2.0);
        assert_eq!(field.get(1, 1).unwrap(), 42.0);
    }

    #[test]
    fn strength_scale_multiplies_result() {
        let (nx, ny) = (16, 16);
        let dx = 10.0 / nx as f64;
        let mut a = PotentialField::new(nx, ny).unwrap();
        let mut b = PotentialField::new(nx, ny).unwrap();
        build(&mut a, PotentialType::Single, dx, 1.0, 1.0, 2.0);
        build(&mut b, PotentialType::Single, dx, 1.0, 2.0, 2.0);
        let va = a.get(nx / 2, ny / 2).unwrap();
        let vb = b.get(nx / 2, ny / 2).unwrap();
        assert!((vb - 2.0 * va).abs() < 1e-12);
    }

    #[test]
    fn brush_stroke_deposits_expected_gaussian() {
        // S6 from the test plan: 64x64 grid, dx = 10/64.
        let (nx, ny) = (64, 64);
        let dx = 10.0 / 64.0;
        let mut field = PotentialField::new(nx, ny).unwrap();
        add_brush_stroke(&mut field, dx, 10, 10, 1.0, 0.3).unwrap();
        assert!((field.get(10, 10).unwrap() - 1.0).abs() < 1e-12);
        let expected_14_10 = (-((4.0 * dx).powi(2)) / (2.0 * 0.09)).exp();
        assert!((field.get(14, 10).unwrap() - expected_14_10).abs() < 1e-9);
        assert!(field.get(40, 10).unwrap().abs() < 1e-9);
    }

    #[test]
    fn brush_strokes_are_additive() {
        let (nx, ny) = (32, 32);
        let dx = 10.0 / 32.0;
        let mut field = PotentialField::new(nx, ny).unwrap();
        add_brush_stroke(&mut field, dx, 16, 16, 1.0, 0.3).unwrap();
        add_brush_stroke(&mut field, dx, 16, 16, 1.0, 0.3).unwrap();
        assert!((field.get(16, 16).unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn brush_out_of_bounds_center_is_an_error() {
        let mut field = PotentialField::new(8, 8).unwrap();
        assert!(add_brush_stroke(&mut field, 1.0, 8, 0, 1.0, 0.3).is_err());
    }
}
