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

// Inverse-sinc FIR design for zero-order-hold DAC pre-equalization.
//
// A ZOH DAC shapes its output by sinc(f/2) (f normalised so 1 = Nyquist).
// The equalizer targets D(f) = 1 / sinc(f/2), sampled at evenly spaced band
// edges and interpolated linearly between them. With unit weight across the
// whole band, the least-squares linear-phase fit is the cosine projection
//
//     a_0 = ∫ D(f) df,    a_k = 2 ∫ D(f) cos(kπf) df,    f ∈ [0, 1]
//
// and each linear segment of D integrates in closed form.

use std::f64::consts::PI;
use std::fmt::Write;

use crate::byte_tables::{CoefficientVector, NUM_TAPS};
use crate::error::{NoiseError, NoiseResult};

pub const DEFAULT_TAPS: usize = 63;
pub const DEFAULT_SCALE_LOG2: u32 = 30;
pub const DEFAULT_SHIFT: u32 = 24;

fn sinc(x: f64) -> f64 {
    if x == 0.0 { 1.0 } else { (PI * x).sin() / (PI * x) }
}

/// Least-squares type-I FIR approximating `1 / sinc(f/2)`.
///
/// `n_taps` must be odd and at least 3.
pub fn inverse_sinc_taps(n_taps: usize) -> NoiseResult<Vec<f64>> {
    if n_taps < 3 || n_taps % 2 == 0 {
        return Err(NoiseError::Config(format!(
            "tap count must be odd and at least 3, got {}",
            n_taps
        )));
    }
    let edges: Vec<f64> = (0..n_taps)
        .map(|i| i as f64 / (n_taps - 1) as f64)
        .collect();
    let desired: Vec<f64> = edges.iter().map(|&e| 1.0 / sinc(e / 2.0)).collect();

    let mid = (n_taps - 1) / 2;
    let mut a = vec![0.0f64; mid + 1];
    for s in 0..n_taps - 1 {
        let (f0, f1) = (edges[s], edges[s + 1]);
        let (d0, d1) = (desired[s], desired[s + 1]);
        a[0] += (f1 - f0) * (d0 + d1) / 2.0;
        let slope = (d1 - d0) / (f1 - f0);
        for (k, ak) in a.iter_mut().enumerate().skip(1) {
            let w = k as f64 * PI;
            *ak += 2.0
                * ((d1 * (w * f1).sin() - d0 * (w * f0).sin()) / w
                    + slope * ((w * f1).cos() - (w * f0).cos()) / (w * w));
        }
    }

    let mut h = vec![0.0f64; n_taps];
    h[mid] = a[0];
    for k in 1..=mid {
        h[mid - k] = a[k] / 2.0;
        h[mid + k] = a[k] / 2.0;
    }
    Ok(h)
}

/// Fixed-point taps: `round(2^scale_log2 * h)`, ties to even.
pub fn quantize(taps: &[f64], scale_log2: u32) -> NoiseResult<Vec<i32>> {
    let scale = 2f64.powi(scale_log2 as i32);
    taps.iter()
        .map(|&t| {
            let q = (t * scale).round_ties_even();
            if q < i32::MIN as f64 || q > i32::MAX as f64 {
                Err(NoiseError::Config(format!(
                    "tap {} does not fit in i32 at scale 2^{}",
                    t, scale_log2
                )))
            } else {
                Ok(q as i32)
            }
        })
        .collect()
}

/// Zero-pad quantized taps to one coefficient per state bit.
pub fn coefficient_vector(taps: &[i32]) -> NoiseResult<CoefficientVector> {
    if taps.len() > NUM_TAPS {
        return Err(NoiseError::Config(format!(
            "{} taps do not fit in a {}-bit shift register",
            taps.len(),
            NUM_TAPS
        )));
    }
    let mut coeffs = [0i32; NUM_TAPS];
    coeffs[..taps.len()].copy_from_slice(taps);
    Ok(coeffs)
}

/// Largest output magnitude before narrowing to 8 bits.
pub fn peak_output(coeffs: &CoefficientVector, shift: u32) -> i64 {
    coeffs.iter().map(|&c| (c as i64).abs()).sum::<i64>() >> shift
}

/// Rust source for the `coeffs` module.
pub fn render_module(
    coeffs: &CoefficientVector,
    n_taps: usize,
    scale_log2: u32,
    shift: u32,
) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(
        out,
        "// Generated by `fir_design --taps {} --scale {} --shift {}`.",
        n_taps, scale_log2, shift
    );
    let _ = writeln!(out, "// Inverse-sinc pre-equalizer for a zero-order-hold DAC.");
    let _ = writeln!(out);
    let _ = writeln!(out, "use crate::byte_tables::CoefficientVector;");
    let _ = writeln!(out);
    let _ = writeln!(out, "pub const FIR_SHIFT: u32 = {};", shift);
    let _ = writeln!(out);
    let _ = writeln!(out, "#[rustfmt::skip]");
    let _ = writeln!(out, "pub const FIR_COEFFS: CoefficientVector = [");
    for c in coeffs {
        let _ = writeln!(out, "    {:>11},", c);
    }
    let _ = writeln!(out, "];");
    out
}
