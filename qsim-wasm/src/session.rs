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

use wasm_bindgen::prelude::*;

use qsim::{PotentialType, UniformSource};

/// Adapts a JavaScript zero-argument function (expected to behave
/// like `Math.random`, returning a fresh value in `[0, 1)` on every
/// call) to [`qsim::UniformSource`], so `Session::measure` can be
/// driven by a JS-side RNG without this crate depending on `rand`.
struct JsUniformSource<'a> {
    func: &'a js_sys::Function,
}

impl UniformSource for JsUniformSource<'_> {
    fn next_uniform(&mut self) -> f64 {
        let this = JsValue::null();
        self.func
            .call0(&this)
            .expect("rng function threw")
            .as_f64()
            .expect("rng function must return a number")
    }
}

fn potential_type_to_str(variant: PotentialType) -> &'static str {
    match variant {
        PotentialType::None => "none",
        PotentialType::Single => "single",
        PotentialType::Double => "double",
        PotentialType::Sinusoid => "sinusoid",
        PotentialType::Quadratic => "quadratic",
        PotentialType::Freehand => "freehand",
    }
}

/// Unknown variant names silently coerce to [`PotentialType::None`],
/// matching the behavior spec.md §6 asks of `set_potential_type`.
fn str_to_potential_type(variant: &str) -> PotentialType {
    match variant {
        "single" => PotentialType::Single,
        "double" => PotentialType::Double,
        "sinusoid" => PotentialType::Sinusoid,
        "quadratic" => PotentialType::Quadratic,
        "freehand" => PotentialType::Freehand,
        _ => PotentialType::None,
    }
}

/// A JavaScript-facing handle on a [`qsim::Session`]. Every method
/// forwards directly to the core; see the `qsim` crate documentation
/// for the behavioral contract.
#[wasm_bindgen]
pub struct Session {
    inner: qsim::Session,
}

#[wasm_bindgen]
impl Session {
    #[wasm_bindgen(constructor)]
    pub fn new(nx: usize, ny: usize, dx: f64, dt: f64, hbar: f64, m: f64, time_scale: f64) -> Result<Session, JsValue> {
        qsim::Session::create_session(nx, ny, dx, dt, hbar, m, time_scale)
            .map(|inner| Session { inner })
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn initialize(&mut self, center_x: f64, center_y: f64, width: f64, momentum_x: f64, momentum_y: f64) {
        self.inner.initialize(center_x, center_y, width, momentum_x, momentum_y);
    }

    pub fn step(&mut self) {
        self.inner.step();
    }

    /// `rng` must behave like `Math.random`: called with no arguments,
    /// returning a fresh value in `[0, 1)` each time.
    pub fn measure(&mut self, x: f64, y: f64, rng: &js_sys::Function) -> JsValue {
        let outcome = {
            let mut source = JsUniformSource { func: rng };
            self.inner.measure(x, y, &mut source)
        };
        let result = js_sys::Object::new();
        js_sys::Reflect::set(&result, &"found".into(), &outcome.found.into()).unwrap();
        js_sys::Reflect::set(&result, &"probability".into(), &outcome.probability.into()).unwrap();
        js_sys::Reflect::set(&result, &"degenerate".into(), &outcome.degenerate.into()).unwrap();
        result.into()
    }

    pub fn set_potential_type(&mut self, variant: &str) {
        self.inner.set_potential_type(str_to_potential_type(variant));
    }

    pub fn set_potential_strength_scale(&mut self, s: f64) {
        self.inner.set_potential_strength_scale(s);
    }

    pub fn add_potential_at(&mut self, gx: usize, gy: usize, delta_v: f64, sigma_brush: f64) -> Result<(), JsValue> {
        self.inner
            .add_potential_at(gx, gy, delta_v, sigma_brush)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn finalize_potential_changes(&mut self) {
        self.inner.finalize_potential_changes();
    }

    pub fn clear_freehand_potential(&mut self) {
        self.inner.clear_freehand_potential();
    }

    pub fn set_time_scale(&mut self, time_scale: f64) {
        self.inner.set_time_scale(time_scale);
    }

    pub fn set_measurement_radius(&mut self, sigma_m: f64) {
        self.inner.set_measurement_radius(sigma_m);
    }

    pub fn set_filter_enabled(&mut self, enabled: bool) {
        self.inner.set_filter_enabled(enabled);
    }

    pub fn get_probability_at(&self, i: usize, j: usize) -> Result<f64, JsValue> {
        self.inner.get_probability_at(i, j).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn get_probability_density(&self) -> js_sys::Float64Array {
        js_sys::Float64Array::from(self.inner.get_probability_density().as_slice())
    }

    pub fn get_phase(&self) -> js_sys::Float64Array {
        js_sys::Float64Array::from(self.inner.get_phase().as_slice())
    }

    pub fn get_total_probability(&self) -> f64 {
        self.inner.get_total_probability()
    }

    pub fn get_time(&self) -> f64 {
        self.inner.get_time()
    }

    pub fn get_parameters(&self) -> JsValue {
        let p = self.inner.get_parameters();
        let obj = js_sys::Object::new();
        js_sys::Reflect::set(&obj, &"nx".into(), &(p.nx as f64).into()).unwrap();
        js_sys::Reflect::set(&obj, &"ny".into(), &(p.ny as f64).into()).unwrap();
        js_sys::Reflect::set(&obj, &"dx".into(), &p.dx.into()).unwrap();
        js_sys::Reflect::set(&obj, &"dt".into(), &p.dt.into()).unwrap();
        js_sys::Reflect::set(&obj, &"timeScale".into(), &p.time_scale.into()).unwrap();
        js_sys::Reflect::set(&obj, &"hbar".into(), &p.hbar.into()).unwrap();
        js_sys::Reflect::set(&obj, &"m".into(), &p.m.into()).unwrap();
        js_sys::Reflect::set(&obj, &"measurementRadius".into(), &p.measurement_radius.into()).unwrap();
        js_sys::Reflect::set(&obj, &"potentialType".into(), &potential_type_to_str(p.potential_type).into()).unwrap();
        js_sys::Reflect::set(&obj, &"potentialStrength".into(), &p.potential_strength.into()).unwrap();
        js_sys::Reflect::set(&obj, &"potentialStrengthScale".into(), &p.potential_strength_scale.into()).unwrap();
        js_sys::Reflect::set(&obj, &"potentialWidth".into(), &p.potential_width.into()).unwrap();
        js_sys::Reflect::set(&obj, &"filterEnabled".into(), &p.filter_enabled.into()).unwrap();
        js_sys::Reflect::set(&obj, &"time".into(), &p.time.into()).unwrap();
        obj.into()
    }

    pub fn grid_shape(&self) -> js_sys::Array {
        let (nx, ny) = self.inner.grid_shape();
        let result = js_sys::Array::new();
        result.push(&(nx as f64).into());
        result.push(&(ny as f64).into());
        result
    }

    pub fn stability_margin(&self) -> f64 {
        self.inner.stability_margin()
    }

    pub fn last_diagnostic(&self) -> Option<String> {
        self.inner.last_diagnostic().map(str::to_owned)
    }
}
