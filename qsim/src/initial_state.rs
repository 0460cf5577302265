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

//! The Gaussian wavepacket factory and its freehand-potential
//! attenuation step.

use num_complex::Complex64;

use crate::complex_field::{normalize, ComplexField};
use crate::error::Error;
use crate::potential::PotentialField;

/// Strength of the freehand attenuation envelope `exp(-alpha*|V|)`.
const FREEHAND_ATTENUATION_ALPHA: f64 = 10.0;

/// Fills `psi` with a Gaussian wavepacket of the given physical
/// center, width and momentum:
///
/// `psi(i,j) = exp(-((x-x0)^2+(y-y0)^2)/(4*width^2)) * exp(i*(px*x+py*y)/hbar)`
///
/// with `x = i*dx, y = j*dx` and no periodic wrap: the envelope is
/// assumed to decay well within the domain. Does not normalize; does
/// not touch freehand attenuation. Callers (the session layer) are
/// responsible for both, in that order, matching the construction
/// order described in the crate-level design notes.
pub fn build_gaussian(
    psi: &mut ComplexField,
    nx: usize,
    ny: usize,
    dx: f64,
    center_x: f64,
    center_y: f64,
    width: f64,
    momentum_x: f64,
    momentum_y: f64,
    hbar: f64,
) {
    let denom = 4.0 * width * width;
    for j in 0..ny {
        let y = j as f64 * dx;
        let dy = y - center_y;
        for i in 0..nx {
            let x = i as f64 * dx;
            let dx_ = x - center_x;
            let envelope = (-(dx_ * dx_ + dy * dy) / denom).exp();
            let phase = (momentum_x * x + momentum_y * y) / hbar;
            let value = Complex64::new(envelope * phase.cos(), envelope * phase.sin());
            let idx = psi.raw_index(i, j);
            let data = psi.as_mut_slice();
            data[idx] = value.re;
            data[idx + 1] = value.im;
        }
    }
}

/// Multiplies `psi` elementwise by `exp(-alpha*|V(i,j)|)` (`alpha =
/// 10`) and renormalizes. Conditions a freshly built wavepacket to
/// vanish on top of user-drawn freehand walls; callers should invoke
/// this only when the session's current potential type is `Freehand`.
pub fn apply_freehand_attenuation(
    psi: &mut ComplexField,
    potential: &PotentialField,
) -> Result<(), Error> {
    if psi.dims() != potential.dims() {
        return Err(Error::ShapeMismatch {
            expected: psi.dims(),
            found: potential.dims(),
        });
    }
    let (nx, ny) = psi.dims();
    let v = potential.as_slice();
    let data = psi.as_mut_slice();
    for k in 0..nx * ny {
        let factor = (-FREEHAND_ATTENUATION_ALPHA * v[k].abs()).exp();
        data[2 * k] *= factor;
        data[2 * k + 1] *= factor;
    }
    normalize(psi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gaussian_peaks_at_its_center() {
        let (nx, ny) = (32, 32);
        let dx = 10.0 / nx as f64;
        let mut psi = ComplexField::new(nx, ny).unwrap();
        build_gaussian(&mut psi, nx, ny, dx, 5.0, 5.0, 0.6, 0.0, 0.0, 1.0);
        let peak = psi.magnitude2(16, 16).unwrap();
        let edge = psi.magnitude2(0, 0).unwrap();
        assert!(peak > edge);
        assert!((psi.phase(16, 16).unwrap()).abs() < 1e-9);
    }

    #[test]
    fn zero_momentum_packet_is_real_and_positive_at_center() {
        let (nx, ny) = (16, 16);
        let dx = 10.0 / nx as f64;
        let mut psi = ComplexField::new(nx, ny).unwrap();
        build_gaussian(&mut psi, nx, ny, dx, 5.0, 5.0, 0.6, 0.0, 0.0, 1.0);
        let c = psi.get(8, 8).unwrap();
        assert!(c.im.abs() < 1e-12);
        assert!(c.re > 0.0);
    }

    #[test]
    fn nonzero_momentum_imparts_a_spatial_phase_gradient() {
        let (nx, ny) = (16, 16);
        let dx = 10.0 / nx as f64;
        let mut psi = ComplexField::new(nx, ny).unwrap();
        build_gaussian(&mut psi, nx, ny, dx, 5.0, 5.0, 2.0, 3.0, 0.0, 1.0);
        let phase_a = psi.phase(4, 8).unwrap();
        let phase_b = psi.phase(5, 8).unwrap();
        assert!((phase_a - phase_b).abs() > 1e-6);
    }

    #[test]
    fn freehand_attenuation_suppresses_amplitude_under_a_wall() {
        let (nx, ny) = (32, 32);
        let dx = 10.0 / nx as f64;
        let mut psi = ComplexField::new(nx, ny).unwrap();
        build_gaussian(&mut psi, nx, ny, dx, 5.0, 5.0, 0.6, 0.0, 0.0, 1.0);
        normalize(&mut psi).unwrap();
        let before = psi.magnitude2(16, 16).unwrap();

        let mut potential = PotentialField::new(nx, ny).unwrap();
        crate::potential::add_brush_stroke(&mut potential, dx, 16, 16, 5.0, 0.2).unwrap();

        apply_freehand_attenuation(&mut psi, &potential).unwrap();
        let after = psi.magnitude2(16, 16).unwrap();
        assert!(after < before);
        assert!((psi.sum_abs2() - 1.0).abs() <= 1e-9);
    }

    #[test]
    fn freehand_attenuation_is_a_near_identity_when_v_is_zero() {
        let (nx, ny) = (16, 16);
        let dx = 10.0 / nx as f64;
        let mut psi = ComplexField::new(nx, ny).unwrap();
        build_gaussian(&mut psi, nx, ny, dx, 5.0, 5.0, 0.6, 0.0, 0.0, 1.0);
        normalize(&mut psi).unwrap();
        let before = psi.clone();

        let potential = PotentialField::new(nx, ny).unwrap();
        apply_freehand_attenuation(&mut psi, &potential).unwrap();
        for j in 0..ny {
            for i in 0..nx {
                let a = psi.get(i, j).unwrap();
                let b = before.get(i, j).unwrap();
                assert!((a - b).norm() < 1e-9);
            }
        }
    }

    #[test]
    fn freehand_attenuation_rejects_shape_mismatch() {
        let mut psi = ComplexField::new(8, 8).unwrap();
        let potential = PotentialField::new(4, 4).unwrap();
        assert!(apply_freehand_attenuation(&mut psi, &potential).is_err());
    }
}
