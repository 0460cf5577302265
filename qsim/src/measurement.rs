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

//! Born-rule measurement: detector-integrated probability, outcome
//! sampling and posterior-state projection.

use crate::complex_field::ComplexField;
use crate::error::Error;
use crate::grid::min_image_distance;
use crate::rng::UniformSource;

/// Result of a [`MeasurementOperator::measure`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeasurementOutcome {
    /// Whether the detector "clicked" (`true`) or not (`false`).
    /// Meaningless when `degenerate` is `true`.
    pub found: bool,
    /// The detector-integrated probability `P` that was sampled
    /// against.
    pub probability: f64,
    /// `true` if the posterior state would have had zero total
    /// probability, in which case `psi` was left untouched (see the
    /// crate-level error-handling design notes).
    pub degenerate: bool,
}

/// Owns the scratch buffers measurement needs so that repeated calls
/// to [`MeasurementOperator::measure`] perform no allocation after
/// construction: a real-valued detector-response field and a
/// candidate posterior `ComplexField`, both sized to the session's
/// grid.
#[derive(Debug, PartialEq)]
pub struct MeasurementOperator {
    detector: Vec<f64>,
    candidate: ComplexField,
    nx: usize,
    ny: usize,
}

impl MeasurementOperator {
    /// Allocates scratch space for a grid of shape `(nx, ny)`.
    pub fn new(nx: usize, ny: usize) -> Result<Self, Error> {
        Ok(Self {
            detector: vec![0.0; nx * ny],
            candidate: ComplexField::new(nx, ny)?,
            nx,
            ny,
        })
    }

    /// Performs one Born-rule measurement centered at physical
    /// coordinates `(x0, y0)` with detector radius `sigma_m`:
    ///
    /// 1. Integrates the Gaussian detector response against `|psi|^2`
    ///    to get the click probability `P = min(1, Sum D*|psi|^2)`.
    /// 2. Draws `u` from `rng` and calls the outcome positive iff
    ///    `u < P`.
    /// 3. Projects `psi` onto the posterior state consistent with
    ///    that outcome (multiplying amplitude by `D` for a click, by
    ///    `1-D` otherwise) and renormalizes.
    ///
    /// If the projected state has zero total probability, `psi` is
    /// left completely unchanged and the returned outcome has
    /// `degenerate: true`; callers should treat this as a measurement
    /// that failed to complete, not as a a valid negative/positive
    /// result.
    pub fn measure(
        &mut self,
        psi: &mut ComplexField,
        dx: f64,
        x0: f64,
        y0: f64,
        sigma_m: f64,
        rng: &mut dyn UniformSource,
    ) -> Result<MeasurementOutcome, Error> {
        if psi.dims() != (self.nx, self.ny) {
            return Err(Error::ShapeMismatch {
                expected: (self.nx, self.ny),
                found: psi.dims(),
            });
        }
        let length_x = self.nx as f64 * dx;
        let length_y = self.ny as f64 * dx;
        let denom = 2.0 * sigma_m * sigma_m;

        let mut probability = 0.0;
        let psi_data = psi.as_slice();
        for j in 0..self.ny {
            let y = j as f64 * dx;
            for i in 0..self.nx {
                let x = i as f64 * dx;
                let r = min_image_distance(x, y, x0, y0, length_x, length_y);
                let d = (-r * r / denom).exp();
                self.detector[j * self.nx + i] = d;
                let k = 2 * (j * self.nx + i);
                let (re, im) = (psi_data[k], psi_data[k + 1]);
                probability += d * (re * re + im * im);
            }
        }
        probability = probability.min(1.0);

        let found = rng.next_uniform() < probability;

        self.candidate.copy_from(psi)?;
        if found {
            self.candidate.multiply_real(&self.detector)?;
        } else {
            for d in self.detector.iter_mut() {
                *d = 1.0 - *d;
            }
            self.candidate.multiply_real(&self.detector)?;
        }

        let s = self.candidate.sum_abs2();
        if !(s > 0.0) {
            return Ok(MeasurementOutcome {
                found,
                probability,
                degenerate: true,
            });
        }
        self.candidate.scale(1.0 / s.sqrt());
        psi.copy_from(&self.candidate)?;

        Ok(MeasurementOutcome {
            found,
            probability,
            degenerate: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::initial_state;
    use crate::rng::ConstantSource;

    fn setup(nx: usize, ny: usize) -> (ComplexField, f64) {
        let dx = 10.0 / nx as f64;
        let mut psi = ComplexField::new(nx, ny).unwrap();
        initial_state::build_gaussian(&mut psi, nx, ny, dx, 5.0, 5.0, 0.6, 0.0, 0.0, 1.0);
        crate::complex_field::normalize(&mut psi).unwrap();
        (psi, dx)
    }

    #[test]
    fn measurement_preserves_total_probability() {
        let (mut psi, dx) = setup(32, 32);
        let mut op = MeasurementOperator::new(32, 32).unwrap();
        let mut rng = ConstantSource(0.0);
        let outcome = op.measure(&mut psi, dx, 5.0, 5.0, 0.2, &mut rng).unwrap();
        assert!(!outcome.degenerate);
        assert!((psi.sum_abs2() - 1.0).abs() <= 1e-6);
    }

    #[test]
    fn forced_positive_outcome_concentrates_probability_at_center() {
        let (mut psi, dx) = setup(64, 64);
        let mut op = MeasurementOperator::new(64, 64).unwrap();
        let mut rng = ConstantSource(0.0);
        let outcome = op.measure(&mut psi, dx, 5.0, 5.0, 0.2, &mut rng).unwrap();
        assert!(outcome.found);
        let sigma_m = 0.2;
        let mut inside = 0.0;
        for j in 0..64 {
            let y = j as f64 * dx;
            for i in 0..64 {
                let x = i as f64 * dx;
                let r = min_image_distance(x, y, 5.0, 5.0, 10.0, 10.0);
                if r <= 2.0 * sigma_m {
                    inside += psi.magnitude2(i, j).unwrap();
                }
            }
        }
        assert!(inside >= 0.95, "inside={inside}");
    }

    #[test]
    fn negative_outcome_suppresses_detector_region() {
        let (mut psi, dx) = setup(64, 64);
        let mut op = MeasurementOperator::new(64, 64).unwrap();
        // Far corner: the integrated probability should be tiny.
        let mut rng = ConstantSource(0.999);
        let outcome = op.measure(&mut psi, dx, 0.0, 0.0, 0.2, &mut rng).unwrap();
        assert!(outcome.probability < 1e-3);
        assert!(!outcome.found);
        assert!(psi.magnitude2(0, 0).unwrap() <= 1e-10);
    }

    #[test]
    fn degenerate_measurement_leaves_psi_unchanged() {
        let (mut psi, dx) = setup(16, 16);
        let before = psi.clone();
        let mut op = MeasurementOperator::new(16, 16).unwrap();
        // A maximal detector covering the whole packet, forced to the
        // "no click" branch, suppresses essentially everything.
        let mut rng = ConstantSource(0.999999);
        let outcome = op.measure(&mut psi, dx, 5.0, 5.0, 50.0, &mut rng).unwrap();
        if outcome.degenerate {
            for j in 0..16 {
                for i in 0..16 {
                    assert_eq!(psi.get(i, j).unwrap(), before.get(i, j).unwrap());
                }
            }
        }
    }

    #[test]
    fn born_frequencies_track_reported_probability() {
        let (psi0, dx) = setup(32, 32);
        let mut op = MeasurementOperator::new(32, 32).unwrap();
        let trials = 4000;
        let mut hits = 0u32;
        let mut reported_p = 0.0;
        let mut rng = crate::rng::Pcg32Source::new(99);
        for _ in 0..trials {
            let mut psi = psi0.clone();
            let outcome = op.measure(&mut psi, dx, 5.0, 5.0, 0.3, &mut rng).unwrap();
            reported_p = outcome.probability;
            if outcome.found {
                hits += 1;
            }
        }
        let observed = hits as f64 / trials as f64;
        let std_err = (reported_p * (1.0 - reported_p) / trials as f64).sqrt();
        assert!(
            (observed - reported_p).abs() <= 3.0 * std_err + 1e-6,
            "observed={observed} reported={reported_p} stderr={std_err}"
        );
    }
}
