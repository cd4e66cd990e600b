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
use std::io;
use std::num::NonZeroUsize;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, mpsc};
use std::time::Instant;

use clap::{ArgAction, Parser};
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use log::info;
use noisegen::stream::MAX_BUFFER_LOG2;
use noisegen::{
    ByteTables, ColorLogger, FIR_COEFFS, FIR_SHIFT, NoiseStream, ProgressUpdate,
    StreamConfig, TermResult,
};

// Nothing sets this: the generator runs until the process is killed or
// the block limit is reached.
static CANCEL_FLAG: AtomicBool = AtomicBool::new(false);

#[derive(Parser)]
#[command(
    name = "noisegen",
    version,
    about = "Generate white noise pre-equalized for zero-order-hold DAC (8-bit signed values)",
    long_about = "Generate white noise pre-equalized for zero-order-hold DAC \
        (8-bit signed values).\n\nRaw samples are written to stdout with no \
        header; sample rate and format must be known by the consumer."
)]
struct Cli {
    /// Number of threads to use
    #[arg(short = 't', long = "threads", default_value = "4")]
    threads: NonZeroUsize,

    /// Buffer size log 2 (size = 2^N)
    #[arg(
        short = 'b',
        long = "buffer",
        default_value = "17",
        value_parser = clap::value_parser!(u32).range(0..=MAX_BUFFER_LOG2 as i64)
    )]
    buffer: u32,

    /// Shift register seed; nonzero, decimal or 0x-prefixed hex
    #[arg(short = 's', long = "seed", default_value = "1", value_parser = parse_seed)]
    seed: u64,

    /// Stop after this many buffers [default: run until killed]
    #[arg(short = 'n', long = "blocks")]
    blocks: Option<u64>,

    /// Show bytes written and throughput on stderr
    #[arg(short = 'p', long = "progress")]
    progress: bool,

    /// Print diagnostic messages (-vv for per-buffer trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,

    /// Quiet mode: suppress all log output
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

fn parse_seed(s: &str) -> Result<u64, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse::<u64>(),
    }
    .map_err(|e| format!("invalid seed \"{}\": {}", s, e))?;
    if parsed == 0 {
        return Err("seed must be nonzero".into());
    }
    Ok(parsed)
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
    let multi = MultiProgress::new();
    let level = logger.max_level();
    LogWrapper::new(multi.clone(), logger).try_init()?;
    log::set_max_level(level);

    let config = StreamConfig {
        threads: cli.threads,
        buffer_log2: cli.buffer,
        seed: cli.seed,
    };

    let tables = Arc::new(ByteTables::new(&FIR_COEFFS, FIR_SHIFT));
    let mut stream = NoiseStream::new(&config, tables)?;
    info!(
        "Generating {} samples per buffer on {} threads (seed {:#x})",
        config.buffer_size(),
        config.threads,
        config.seed
    );

    let (progress_handle, sender) = if cli.progress {
        let (sender, receiver) = mpsc::channel::<ProgressUpdate>();
        let style = ProgressStyle::with_template(
            "{prefix} {spinner} {binary_bytes} ({binary_bytes_per_sec}) {msg}",
        )?;
        let pg = multi
            .add(ProgressBar::new_spinner())
            .with_style(style)
            .with_prefix(format!("{}", "[Generating]".bold()));

        // Drive the spinner from its own thread so the sink loop never waits on it.
        let progress_handle = std::thread::spawn(move || {
            while let Ok(update) = receiver.recv() {
                pg.set_position(update.bytes);
                pg.set_message(format!("{} buffers", update.blocks));
            }
            pg.finish();
        });
        (Some(progress_handle), Some(sender))
    } else {
        (None, None)
    };

    let start = Instant::now();
    let mut stdout = io::stdout().lock();
    let result = stream.run(&mut stdout, &CANCEL_FLAG, cli.blocks, sender);

    if let Some(progress_handle) = progress_handle
        && let Err(e) = progress_handle.join()
    {
        return Err(format!("Progress thread panicked: {:?}", e).into());
    }

    let blocks = match result {
        Ok(blocks) => blocks,
        Err(e) if e.is_broken_pipe() => {
            info!("Output closed by reader");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let secs = start.elapsed().as_secs_f64();
    let bytes = blocks * config.buffer_size() as u64;
    info!(
        "Wrote {} buffers ({} bytes) in {:.2}s",
        blocks, bytes, secs
    );
    Ok(())
}
