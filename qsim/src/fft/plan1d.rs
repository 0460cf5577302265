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

//! Radix-2 decimation-in-time Cooley-Tukey FFT, operating in place on
//! an interleaved complex buffer of length `2*N`.

use crate::error::Error;

/// An immutable precomputed plan for a single transform size `N`
/// (power of two, `>= 2`): a bit-reversal permutation and a table of
/// `N/2` twiddle factors. Shared by every row and column pass of
/// [`crate::fft::Fft2D`] that operates on lines of this length.
#[derive(Debug, PartialEq)]
pub struct FftPlan1D {
    n: usize,
    log2n: u32,
    bit_reverse: Vec<usize>,
    /// `(cos, sin)` of `-2*pi*k/N` for `k = 0 .. N/2`.
    twiddles: Vec<(f64, f64)>,
}

impl FftPlan1D {
    /// Builds a new plan for transforms of length `n`.
    pub fn new(n: usize) -> Result<Self, Error> {
        if n < 2 || !n.is_power_of_two() {
            return Err(Error::InvalidFftSize { size: n });
        }
        let log2n = n.trailing_zeros();
        let bit_reverse = (0..n).map(|i| reverse_bits(i, log2n)).collect();
        let twiddles = (0..n / 2)
            .map(|k| {
                let angle = -2.0 * std::f64::consts::PI * (k as f64) / (n as f64);
                (angle.cos(), angle.sin())
            })
            .collect();
        Ok(Self {
            n,
            log2n,
            bit_reverse,
            twiddles,
        })
    }

    /// Transform length this plan was built for.
    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    /// Forward transform, in place, on an interleaved buffer of
    /// length `2*N`.
    pub fn forward(&self, data: &mut [f64]) {
        debug_assert_eq!(data.len(), 2 * self.n);
        self.permute(data);
        self.butterflies(data);
    }

    /// Inverse transform, in place, on an interleaved buffer of
    /// length `2*N`. Implemented as a forward transform on the
    /// conjugated input, followed by conjugating and scaling the
    /// result by `1/N` (mathematically equivalent to negating the
    /// twiddle angles, but lets forward and inverse share one
    /// butterfly loop and one twiddle table).
    pub fn inverse(&self, data: &mut [f64]) {
        debug_assert_eq!(data.len(), 2 * self.n);
        conjugate(data);
        self.permute(data);
        self.butterflies(data);
        conjugate(data);
        let scale = 1.0 / self.n as f64;
        for x in data.iter_mut() {
            *x *= scale;
        }
    }

    /// Applies the bit-reversal permutation, swapping only when the
    /// reversed index is greater than the current one so that an
    /// in-place pass never undoes its own swap.
    fn permute(&self, data: &mut [f64]) {
        for i in 0..self.n {
            let r = self.bit_reverse[i];
            if r > i {
                let (ai, ar) = (2 * i, 2 * r);
                data.swap(ai, ar);
                data.swap(ai + 1, ar + 1);
            }
        }
    }

    /// Runs the decimation-in-time butterfly stages for `len = 2, 4,
    /// .., N` over an already bit-reversed buffer.
    fn butterflies(&self, data: &mut [f64]) {
        let n = self.n;
        let mut len = 2usize;
        for _ in 0..self.log2n {
            let half = len / 2;
            let twiddle_step = n / len;
            let mut i = 0;
            while i < n {
                let mut twiddle_idx = 0usize;
                for j in 0..half {
                    let (wcos, wsin) = self.twiddles[twiddle_idx];
                    let lo = 2 * (i + j);
                    let hi = 2 * (i + j + half);
                    let (xre, xim) = (data[hi], data[hi + 1]);
                    let tre = wcos * xre - wsin * xim;
                    let tim = wcos * xim + wsin * xre;
                    let (are, aim) = (data[lo], data[lo + 1]);
                    data[lo] = are + tre;
                    data[lo + 1] = aim + tim;
                    data[hi] = are - tre;
                    data[hi + 1] = aim - tim;
                    twiddle_idx += twiddle_step;
                }
                i += len;
            }
            len *= 2;
        }
    }
}

#[inline]
fn conjugate(data: &mut [f64]) {
    for im in data.chunks_exact_mut(2).map(|c| &mut c[1]) {
        *im = -*im;
    }
}

#[inline]
fn reverse_bits(mut i: usize, bits: u32) -> usize {
    let mut r = 0usize;
    for _ in 0..bits {
        r = (r << 1) | (i & 1);
        i >>= 1;
    }
    r
}
