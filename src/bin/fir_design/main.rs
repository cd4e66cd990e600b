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

use std::error::Error;
use std::io::{self, Write};

use clap::{ArgAction, Parser};
use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;
use log::{info, warn};
use noisegen::design::{
    DEFAULT_SCALE_LOG2, DEFAULT_SHIFT, DEFAULT_TAPS, coefficient_vector,
    inverse_sinc_taps, peak_output, quantize, render_module,
};
use noisegen::{ColorLogger, NoiseResult, TermResult};

#[derive(Parser, Debug)]
#[command(
    name = "fir_design",
    about = "Design the inverse-sinc pre-equalizer and print it as the coeffs module",
    version
)]
struct Cli {
    /// Number of taps (odd, at most 64)
    #[arg(short = 'n', long = "taps", default_value_t = DEFAULT_TAPS)]
    taps: usize,

    /// Fixed-point scale log 2 (taps are multiplied by 2^N)
    #[arg(
        short = 'c',
        long = "scale",
        default_value_t = DEFAULT_SCALE_LOG2,
        value_parser = clap::value_parser!(u32).range(0..=31)
    )]
    scale: u32,

    /// Output right shift applied to the filter sum
    #[arg(
        short = 's',
        long = "shift",
        default_value_t = DEFAULT_SHIFT,
        value_parser = clap::value_parser!(u32).range(0..=31)
    )]
    shift: u32,

    /// Print diagnostic messages
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,

    /// Quiet mode: suppress all log output
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

/// A quantized design ready to be written out.
struct Design {
    module: String,
    dc_gain: f64,
    peak: i64,
    abs_sum: i64,
}

impl Design {
    /// `filter_one` would wrap some sums when narrowing to 8 bits.
    fn wraps(&self) -> bool {
        self.peak > i8::MAX as i64
    }

    /// Table entries or their sum would overflow `i32`.
    fn overflows(&self) -> bool {
        self.abs_sum > i32::MAX as i64
    }
}

fn design(n_taps: usize, scale: u32, shift: u32) -> NoiseResult<Design> {
    let taps = inverse_sinc_taps(n_taps)?;
    let coeffs = coefficient_vector(&quantize(&taps, scale)?)?;
    Ok(Design {
        module: render_module(&coeffs, n_taps, scale, shift),
        dc_gain: taps.iter().sum(),
        peak: peak_output(&coeffs, shift),
        abs_sum: coeffs.iter().map(|&c| (c as i64).abs()).sum(),
    })
}

fn main() -> TermResult {
    match run() {
        Ok(()) => TermResult(Ok(())),
        Err(e) => TermResult(Err(e.into())),
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let logger = ColorLogger::new(cli.quiet, cli.verbose);
    let level = logger.max_level();
    LogWrapper::new(MultiProgress::new(), logger).try_init()?;
    log::set_max_level(level);

    let design = design(cli.taps, cli.scale, cli.shift)?;
    info!("Designed {} taps, DC gain {:.6}", cli.taps, design.dc_gain);
    if design.wraps() {
        warn!(
            "Peak output {} exceeds the 8-bit range; samples will wrap",
            design.peak
        );
    } else {
        info!(
            "Peak output {} (headroom {})",
            design.peak,
            i8::MAX as i64 - design.peak
        );
    }
    if design.overflows() {
        warn!("Sum of |taps| {} overflows i32 table entries", design.abs_sum);
    }

    let mut stdout = io::stdout().lock();
    stdout.write_all(design.module.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use noisegen::{FIR_COEFFS, FIR_SHIFT};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_reproduce_shipped_table() {
        let cli = Cli::try_parse_from(["fir_design"]).unwrap();
        assert_eq!((cli.taps, cli.scale, cli.shift), (63, 30, 24));
        assert!(!cli.quiet);

        let design = design(cli.taps, cli.scale, cli.shift).unwrap();
        assert!(!design.wraps());
        assert!(!design.overflows());
        assert!(design.module.contains(&format!("pub const FIR_SHIFT: u32 = {};", FIR_SHIFT)));
        let listed = design.module.lines().filter(|l| l.trim_end().ends_with(',')).count();
        assert_eq!(listed, FIR_COEFFS.len());
    }

    #[test]
    fn smaller_shift_triggers_wrap_warning() {
        let design = design(DEFAULT_TAPS, DEFAULT_SCALE_LOG2, 20).unwrap();
        assert!(design.peak > i8::MAX as i64);
        assert!(design.wraps());
    }

    #[test]
    fn accepts_quiet_flag() {
        let cli = Cli::try_parse_from(["fir_design", "-q", "--shift", "20"]).unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.shift, 20);
    }

    #[test]
    fn even_tap_count_is_rejected() {
        assert!(design(62, DEFAULT_SCALE_LOG2, DEFAULT_SHIFT).is_err());
    }
}
