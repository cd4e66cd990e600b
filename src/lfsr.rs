/*
 Copyright (c) 2023 clone206

 This file is part of noisegen

 noisegen is free software: you can redistribute it and/or modify it
 under the terms of the GNU General Public License as published by the
 Free Software Foundation, either version 3 of the License, or
 (at your option) any later version.

 noisegen is distributed in the hope that it will be useful, but
 WITHOUT ANY WARRANTY; without even the implied warranty of
 MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 GNU General Public License for more details.
 You should have received a copy of the GNU General Public License
 along with noisegen. If not, see <https://www.gnu.org/licenses/>.
*/

// 64-bit Fibonacci LFSR with maximal-length sequence.
// Polynomial x^64 + x^63 + x^61 + x^60 + 1; at 100 MHz it repeats
// in about 2924.7 years.
//
// The register is also the filter's delay line: bit k holds the symbol
// emitted k steps ago, so any 64-tap FIR over the bit stream can be
// evaluated from a single saved state word.

/// Feedback taps: bits 63, 62, 60 and 59.
pub const TAPS: u64 = (1 << 63) | (1 << 62) | (1 << 60) | (1 << 59);

/// Seed used when none is given.
pub const DEFAULT_SEED: u64 = 1;

/// Shift `state` left by one and insert the parity of the tapped bits at bit 0.
#[inline(always)]
pub(crate) fn feedback_shift(state: u64, taps: u64) -> u64 {
    let bit = ((state & taps).count_ones() & 1) as u64;
    (state << 1) | bit
}

#[derive(Debug, Clone)]
pub struct Lfsr64 {
    state: u64,
}

impl Default for Lfsr64 {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl Lfsr64 {
    /// Start the register at `seed`.
    ///
    /// Zero is a fixed point of the feedback function: a zero seed yields an
    /// all-zero stream forever. It is accepted as-is; rejecting it is the
    /// caller's job.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn state(&self) -> u64 {
        self.state
    }

    /// Step once and return the new state.
    #[inline]
    pub fn advance(&mut self) -> u64 {
        self.state = feedback_shift(self.state, TAPS);
        self.state
    }

    /// Store successive states into `buffer`, in order.
    pub fn fill(&mut self, buffer: &mut [u64]) {
        for slot in buffer.iter_mut() {
            *slot = self.advance();
        }
    }
}

impl Iterator for Lfsr64 {
    type Item = u64;

    #[inline]
    fn next(&mut self) -> Option<u64> {
        Some(self.advance())
    }
}
