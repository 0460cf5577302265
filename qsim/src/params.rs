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

//! The read-only snapshot returned by [`crate::session::Session::get_parameters`].

use crate::potential::PotentialType;

/// A full snapshot of every scalar and enum parameter that defines a
/// [`crate::session::Session`]'s current configuration. Cheap to
/// construct (a handful of `Copy` fields); intended for a UI layer to
/// re-render its controls from a single call rather than polling many
/// individual getters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionParameters {
    pub nx: usize,
    pub ny: usize,
    pub dx: f64,
    pub dt: f64,
    pub time_scale: f64,
    pub hbar: f64,
    pub m: f64,
    pub measurement_radius: f64,
    pub potential_type: PotentialType,
    pub potential_strength: f64,
    pub potential_strength_scale: f64,
    pub potential_width: f64,
    pub filter_enabled: bool,
    pub time: f64,
}
