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

//! JavaScript/WebAssembly bindings for the `qsim` quantum wavefunction
//! simulator core.
//!
//! This crate owns no numerical state of its own: it wraps
//! [`qsim::Session`] behind a `#[wasm_bindgen]` struct and forwards
//! every method in the core's public contract one-to-one, translating
//! `Vec<f64>`/enum return values into `JsValue`s the host can consume
//! directly. Please see the documentation of the `qsim` crate for a
//! detailed description of the simulation semantics.

mod session;

pub use session::Session;

use wasm_bindgen::prelude::*;

/// Installs a panic hook that forwards Rust panics to the browser
/// console instead of an opaque "unreachable executed" trap. Call
/// once from JavaScript before constructing a [`Session`].
#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
