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

//! [`Session`]: the facade a host application drives. Owns every
//! mutable buffer the simulation needs and exposes the public
//! contract in one place.

use crate::complex_field::{normalize, ComplexField};
use crate::engine::SplitStepEngine;
use crate::error::Error;
use crate::fft::Fft2D;
use crate::initial_state;
use crate::measurement::{MeasurementOperator, MeasurementOutcome};
use crate::operators::EvolutionOperators;
use crate::params::SessionParameters;
use crate::potential::{self, PotentialField, PotentialType};
use crate::rng::UniformSource;

const DEFAULT_POTENTIAL_STRENGTH: f64 = 1.0;
const DEFAULT_POTENTIAL_STRENGTH_SCALE: f64 = 1.0;
const DEFAULT_POTENTIAL_WIDTH: f64 = 2.0;
const DEFAULT_MEASUREMENT_RADIUS: f64 = 0.2;

const STRENGTH_SCALE_RANGE: (f64, f64) = (0.1, 10.0);
const MEASUREMENT_RADIUS_RANGE: (f64, f64) = (0.05, 2.0);

/// Owns ψ, the scratch buffer, `V`, the two precomputed evolution
/// operators, the FFT plan and measurement scratch, and every scalar
/// session parameter. The single entry point a host application
/// drives; see the crate-level contract in the module documentation
/// for the behavioral guarantees each method makes.
#[derive(Debug, PartialEq)]
pub struct Session {
    nx: usize,
    ny: usize,
    dx: f64,
    dt: f64,
    time_scale: f64,
    hbar: f64,
    m: f64,
    measurement_radius: f64,
    potential_type: PotentialType,
    potential_strength: f64,
    potential_strength_scale: f64,
    potential_width: f64,
    filter_enabled: bool,
    time: f64,

    psi: ComplexField,
    scratch: ComplexField,
    potential: PotentialField,
    operators: EvolutionOperators,
    fft: Fft2D,
    measurement: MeasurementOperator,

    last_diagnostic: Option<String>,
}

impl Session {
    /// Creates a new session on an `(nx, ny)` grid with cell spacing
    /// `dx`, base time step `dt`, reduced Planck constant `hbar`,
    /// particle mass `m`, and an initial `time_scale` multiplier.
    ///
    /// `psi` starts at zero; callers must follow up with
    /// [`Session::initialize`] before stepping or measuring.
    pub fn create_session(
        nx: usize,
        ny: usize,
        dx: f64,
        dt: f64,
        hbar: f64,
        m: f64,
        time_scale: f64,
    ) -> Result<Self, Error> {
        if !is_power_of_two_at_least_two(nx) {
            return Err(Error::InvalidDimension { dim: "Nx", value: nx });
        }
        if !is_power_of_two_at_least_two(ny) {
            return Err(Error::InvalidDimension { dim: "Ny", value: ny });
        }
        require_positive_finite("dx", dx)?;
        require_positive_finite("dt", dt)?;
        require_positive_finite("hbar", hbar)?;
        require_positive_finite("m", m)?;
        require_positive_finite("timeScale", time_scale)?;

        let potential = PotentialField::new(nx, ny)?;
        let mut operators = EvolutionOperators::new(nx, ny)?;
        let mut session = Self {
            nx,
            ny,
            dx,
            dt,
            time_scale,
            hbar,
            m,
            measurement_radius: DEFAULT_MEASUREMENT_RADIUS,
            potential_type: PotentialType::None,
            potential_strength: DEFAULT_POTENTIAL_STRENGTH,
            potential_strength_scale: DEFAULT_POTENTIAL_STRENGTH_SCALE,
            potential_width: DEFAULT_POTENTIAL_WIDTH,
            filter_enabled: true,
            time: 0.0,
            psi: ComplexField::new(nx, ny)?,
            scratch: ComplexField::new(nx, ny)?,
            potential,
            operators: {
                operators.rebuild_kinetic(dx, hbar, m, dt * time_scale, true);
                operators
            },
            fft: Fft2D::new(nx, ny)?,
            measurement: MeasurementOperator::new(nx, ny)?,
            last_diagnostic: None,
        };
        session.operators.rebuild_potential_half(&session.potential, session.dt_eff(), hbar)?;
        session.check_stability();
        Ok(session)
    }

    #[inline]
    fn dt_eff(&self) -> f64 {
        self.dt * self.time_scale
    }

    fn rebuild_kinetic(&mut self) {
        let dt_eff = self.dt_eff();
        self.operators
            .rebuild_kinetic(self.dx, self.hbar, self.m, dt_eff, self.filter_enabled);
    }

    fn rebuild_potential_half(&mut self) {
        let dt_eff = self.dt_eff();
        self.operators
            .rebuild_potential_half(&self.potential, dt_eff, self.hbar)
            .expect("potential field shape is fixed for the session's lifetime");
    }

    /// Stability margin: the ratio of `Δt_eff` to the stability bound
    /// `2*m*dx^2/hbar`. Values `>= 1.0` mean the bound is violated and
    /// the evolution is expected to be numerically unstable.
    pub fn stability_margin(&self) -> f64 {
        let bound = 2.0 * self.m * self.dx * self.dx / self.hbar;
        self.dt_eff() / bound
    }

    fn check_stability(&mut self) {
        let margin = self.stability_margin();
        if margin >= 1.0 {
            let message = format!(
                "stability bound violated: dt_eff/bound = {margin:.3} (>= 1.0); evolution may be unphysical"
            );
            log::warn!("{message}");
            self.last_diagnostic = Some(message);
        }
    }

    /// The most recent diagnostic message emitted by a parameter
    /// change, if any. Cleared only by being overwritten by a fresh
    /// diagnostic; there is no explicit "clear" operation since a
    /// still-violated bound should keep reporting.
    pub fn last_diagnostic(&self) -> Option<&str> {
        self.last_diagnostic.as_deref()
    }

    /// `(Nx, Ny)`, fixed for the session's lifetime.
    pub fn grid_shape(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    /// Overwrites ψ with a normalized Gaussian wavepacket and resets
    /// `time` to zero. See spec §4.8: attenuates by the current
    /// potential when `potential_type == Freehand`.
    pub fn initialize(
        &mut self,
        center_x: f64,
        center_y: f64,
        width: f64,
        momentum_x: f64,
        momentum_y: f64,
    ) {
        initial_state::build_gaussian(
            &mut self.psi,
            self.nx,
            self.ny,
            self.dx,
            center_x,
            center_y,
            width,
            momentum_x,
            momentum_y,
            self.hbar,
        );
        normalize(&mut self.psi).expect("a freshly built Gaussian wavepacket is never degenerate");
        if self.potential_type == PotentialType::Freehand {
            initial_state::apply_freehand_attenuation(&mut self.psi, &self.potential)
                .expect("psi and potential always share the session's grid shape");
        }
        self.time = 0.0;
    }

    /// Advances ψ by one Strang-split time step and advances `time`
    /// by `Δt_eff`. Never fails; numerical instability beyond the
    /// stability bound is silent (see [`Session::stability_margin`]).
    pub fn step(&mut self) {
        let potential_active = self.potential_type != PotentialType::None;
        SplitStepEngine::step(
            &mut self.psi,
            &mut self.scratch,
            &mut self.fft,
            &self.operators,
            potential_active,
        )
        .expect("psi, scratch and the operator fields always share the session's grid shape");
        self.time += self.dt_eff();
    }

    /// Performs one Born-rule measurement centered at physical
    /// coordinates `(x, y)`, drawing from `rng`. See
    /// [`crate::measurement::MeasurementOperator::measure`] for the
    /// exact projection semantics.
    pub fn measure(&mut self, x: f64, y: f64, rng: &mut dyn UniformSource) -> MeasurementOutcome {
        self.measurement
            .measure(&mut self.psi, self.dx, x, y, self.measurement_radius, rng)
            .expect("psi and the measurement scratch always share the session's grid shape")
    }

    /// Sets the active potential family, rebuilding `V` and
    /// `U_V_half`. Switching to [`PotentialType::Freehand`] zeroes
    /// `V` first, per spec §4.4.
    pub fn set_potential_type(&mut self, variant: PotentialType) {
        self.potential_type = variant;
        if variant == PotentialType::Freehand {
            self.potential.zero();
        } else {
            potential::build(
                &mut self.potential,
                variant,
                self.dx,
                self.potential_strength,
                self.potential_strength_scale,
                self.potential_width,
            );
        }
        self.rebuild_potential_half();
    }

    /// Sets `s_V`, clamped to `[0.1, 10]`, rebuilding `V` (for
    /// analytic families) and `U_V_half`. A no-op on `V` itself when
    /// the active family is `Freehand`, since freehand potentials are
    /// never rebuilt from a formula.
    pub fn set_potential_strength_scale(&mut self, s: f64) {
        self.potential_strength_scale = s.clamp(STRENGTH_SCALE_RANGE.0, STRENGTH_SCALE_RANGE.1);
        potential::build(
            &mut self.potential,
            self.potential_type,
            self.dx,
            self.potential_strength,
            self.potential_strength_scale,
            self.potential_width,
        );
        self.rebuild_potential_half();
    }

    /// Additive brush stroke on `V` at grid cell `(gx, gy)`. Does not
    /// rebuild `U_V_half`; call [`Session::finalize_potential_changes`]
    /// after a batch of strokes.
    pub fn add_potential_at(
        &mut self,
        gx: usize,
        gy: usize,
        delta_v: f64,
        sigma_brush: f64,
    ) -> Result<(), Error> {
        potential::add_brush_stroke(&mut self.potential, self.dx, gx, gy, delta_v, sigma_brush)
    }

    /// Rebuilds `U_V_half` from the current `V`. The only path by
    /// which brush-stroke changes become visible to [`Session::step`].
    pub fn finalize_potential_changes(&mut self) {
        self.rebuild_potential_half();
    }

    /// Zeroes `V` and rebuilds `U_V_half`.
    pub fn clear_freehand_potential(&mut self) {
        self.potential.zero();
        self.rebuild_potential_half();
    }

    /// Updates `timeScale`, rebuilding both evolution operators and
    /// re-checking the stability bound.
    pub fn set_time_scale(&mut self, time_scale: f64) {
        self.time_scale = time_scale;
        self.rebuild_kinetic();
        self.rebuild_potential_half();
        self.check_stability();
    }

    /// Sets `sigma_m`, clamped to `[0.05, 2.0]`.
    pub fn set_measurement_radius(&mut self, sigma_m: f64) {
        self.measurement_radius = sigma_m.clamp(MEASUREMENT_RADIUS_RANGE.0, MEASUREMENT_RADIUS_RANGE.1);
    }

    /// Toggles the spectral anti-aliasing filter, rebuilding `U_T`.
    pub fn set_filter_enabled(&mut self, enabled: bool) {
        self.filter_enabled = enabled;
        self.rebuild_kinetic();
    }

    /// `|psi(i,j)|^2`.
    pub fn get_probability_at(&self, i: usize, j: usize) -> Result<f64, Error> {
        self.psi.magnitude2(i, j)
    }

    /// A fresh, caller-owned copy of `|psi|^2` over the whole grid, in
    /// row-major cell order.
    pub fn get_probability_density(&self) -> Vec<f64> {
        self.psi
            .as_slice()
            .chunks_exact(2)
            .map(|c| c[0] * c[0] + c[1] * c[1])
            .collect()
    }

    /// A fresh, caller-owned copy of `arg(psi)` over the whole grid,
    /// each element in `[-pi, pi]`, in row-major cell order.
    pub fn get_phase(&self) -> Vec<f64> {
        self.psi
            .as_slice()
            .chunks_exact(2)
            .map(|c| c[1].atan2(c[0]))
            .collect()
    }

    /// `Sum |psi|^2`, the sum-normalization scalar (not the continuous
    /// integral).
    pub fn get_total_probability(&self) -> f64 {
        self.psi.sum_abs2()
    }

    /// The session clock, in the same physical time units as `dt`.
    pub fn get_time(&self) -> f64 {
        self.time
    }

    /// A full snapshot of the session's scalar and enum parameters.
    pub fn get_parameters(&self) -> SessionParameters {
        SessionParameters {
            nx: self.nx,
            ny: self.ny,
            dx: self.dx,
            dt: self.dt,
            time_scale: self.time_scale,
            hbar: self.hbar,
            m: self.m,
            measurement_radius: self.measurement_radius,
            potential_type: self.potential_type,
            potential_strength: self.potential_strength,
            potential_strength_scale: self.potential_strength_scale,
            potential_width: self.potential_width,
            filter_enabled: self.filter_enabled,
            time: self.time,
        }
    }
}

fn is_power_of_two_at_least_two(n: usize) -> bool {
    n >= 2 && n & (n - 1) == 0
}

fn require_positive_finite(name: &'static str, value: f64) -> Result<(), Error> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter { name, value })
    }
}
