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

//! Precomputed diagonal phase operators for the split-step evolution:
//! the momentum-space kinetic half (well, full) step `U_T` and the
//! position-space potential half step `U_V_half`.

use num_complex::Complex64;

use crate::complex_field::ComplexField;
use crate::error::Error;
use crate::grid::{nyquist, wavevector};
use crate::potential::PotentialField;

/// Holds `U_T` and `U_V_half`, the two diagonal operators the
/// split-step engine applies every call to [`crate::engine::step`].
/// Both are rebuilt in full whenever one of their defining inputs
/// changes and are read-only during a step: there is no incremental
/// update path, by design (see the crate-level design notes), which
/// keeps the hot loop allocation-free and branchless with respect to
/// parameters.
#[derive(Debug, PartialEq)]
pub struct EvolutionOperators {
    u_t: ComplexField,
    u_v_half: ComplexField,
}

impl EvolutionOperators {
    /// Allocates zeroed operator fields of shape `(nx, ny)`. Callers
    /// must follow up with [`EvolutionOperators::rebuild_kinetic`] and
    /// [`EvolutionOperators::rebuild_potential_half`] before running
    /// any evolution steps.
    pub fn new(nx: usize, ny: usize) -> Result<Self, Error> {
        Ok(Self {
            u_t: ComplexField::new(nx, ny)?,
            u_v_half: ComplexField::new(nx, ny)?,
        })
    }

    /// Read-only access to the kinetic operator.
    pub fn u_t(&self) -> &ComplexField {
        &self.u_t
    }

    /// Read-only access to the potential half-step operator.
    pub fn u_v_half(&self) -> &ComplexField {
        &self.u_v_half
    }

    /// Rebuilds `U_T` from the kinetic-step inputs: grid geometry,
    /// physical constants, the effective time step and the spectral
    /// anti-aliasing filter toggle.
    pub fn rebuild_kinetic(&mut self, dx: f64, hbar: f64, m: f64, dt_eff: f64, filter_enabled: bool) {
        let (nx, ny) = self.u_t.dims();
        let length_x = nx as f64 * dx;
        let length_y = ny as f64 * dx;
        let k_max = nyquist(dx);
        for j in 0..ny {
            let ky = wavevector(j, ny, length_y);
            for i in 0..nx {
                let kx = wavevector(i, nx, length_x);
                let k2 = kx * kx + ky * ky;
                let phase = -(hbar * dt_eff / (2.0 * m)) * k2;
                let filter = if filter_enabled {
                    spectral_filter(k2.sqrt(), k_max)
                } else {
                    1.0
                };
                let value = Complex64::new(phase.cos(), phase.sin()) * filter;
                let idx = self.u_t.raw_index(i, j);
                let data = self.u_t.as_mut_slice();
                data[idx] = value.re;
                data[idx + 1] = value.im;
            }
        }
    }

    /// Rebuilds `U_V_half` from the current potential field and the
    /// effective time step.
    pub fn rebuild_potential_half(
        &mut self,
        potential: &PotentialField,
        dt_eff: f64,
        hbar: f64,
    ) -> Result<(), Error> {
        let (nx, ny) = self.u_v_half.dims();
        if potential.dims() != (nx, ny) {
            return Err(Error::ShapeMismatch {
                expected: (nx, ny),
                found: potential.dims(),
            });
        }
        let v = potential.as_slice();
        let data = self.u_v_half.as_mut_slice();
        for j in 0..ny {
            for i in 0..nx {
                let phase = -(dt_eff / (2.0 * hbar)) * v[j * nx + i];
                let idx = 2 * (j * nx + i);
                data[idx] = phase.cos();
                data[idx + 1] = phase.sin();
            }
        }
        Ok(())
    }
}

/// Spectral anti-aliasing filter: unity below `0.9*k_max`, a Gaussian
/// roll-off reaching the Nyquist cutoff above it.
fn spectral_filter(k: f64, k_max: f64) -> f64 {
    let knee = 0.9 * k_max;
    if k <= knee {
        1.0
    } else {
        let width = 0.1 * k_max;
        (-((k - knee) / width).powi(2)).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::potential::{build, PotentialType};

    #[test]
    fn kinetic_operator_is_unit_modulus_without_filter() {
        let (nx, ny) = (16, 16);
        let mut ops = EvolutionOperators::new(nx, ny).unwrap();
        ops.rebuild_kinetic(1.0, 1.0, 1.0, 0.01, false);
        for j in 0..ny {
            for i in 0..nx {
                let c = ops.u_t().get(i, j).unwrap();
                assert!((c.norm() - 1.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn kinetic_operator_is_identity_at_zero_dt() {
        let (nx, ny) = (8, 8);
        let mut ops = EvolutionOperators::new(nx, ny).unwrap();
        ops.rebuild_kinetic(1.0, 1.0, 1.0, 0.0, true);
        for j in 0..ny {
            for i in 0..nx {
                let c = ops.u_t().get(i, j).unwrap();
                assert!((c.re - 1.0).abs() < 1e-12);
                assert!(c.im.abs() < 1e-12);
            }
        }
    }

    #[test]
    fn filter_attenuates_high_frequencies_but_not_dc() {
        let (nx, ny) = (32, 32);
        let mut ops = EvolutionOperators::new(nx, ny).unwrap();
        ops.rebuild_kinetic(1.0, 1.0, 1.0, 0.01, true);
        let dc = ops.u_t().get(0, 0).unwrap();
        assert!((dc.norm() - 1.0).abs() < 1e-9);
        let nyquist_bin = ops.u_t().get(nx / 2, ny / 2).unwrap();
        assert!(nyquist_bin.norm() < 0.5, "expected strong attenuation near Nyquist");
    }

    #[test]
    fn potential_half_step_is_unit_modulus() {
        let (nx, ny) = (16, 16);
        let dx = 10.0 / nx as f64;
        let mut potential = PotentialField::new(nx, ny).unwrap();
        build(&mut potential, PotentialType::Single, dx, 1.0, 1.0, 2.0);
        let mut ops = EvolutionOperators::new(nx, ny).unwrap();
        ops.rebuild_potential_half(&potential, 0.01, 1.0).unwrap();
        for j in 0..ny {
            for i in 0..nx {
                let c = ops.u_v_half().get(i, j).unwrap();
                assert!((c.norm() - 1.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn potential_half_step_rejects_shape_mismatch() {
        let mut ops = EvolutionOperators::new(8, 8).unwrap();
        let potential = PotentialField::new(4, 4).unwrap();
        assert!(ops.rebuild_potential_half(&potential, 0.01, 1.0).is_err());
    }
}
