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
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;
use log::{debug, info, warn};
use noisegen::{ColorLogger, Histogram, TermResult};

const READ_BLOCK: usize = 1 << 20;

#[derive(Parser, Debug)]
#[command(
    name = "noise_histogram",
    about = "Count byte values of raw signed 8-bit noise, one line per value from -128 to 127",
    version
)]
struct Cli {
    /// Input file of raw samples (use - for stdin)
    #[arg(name = "FILE", default_value = "-")]
    file: PathBuf,

    /// Stop after this many bytes; needed when reading an endless stream
    #[arg(short = 'l', long = "limit")]
    limit: Option<u64>,

    /// Print "value count" pairs instead of bare counts
    #[arg(short = 'x', long = "values")]
    with_values: bool,

    /// Print diagnostic messages
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,

    /// Quiet mode: suppress all log output
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
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

    let input: Box<dyn Read> = if cli.file.as_os_str() == "-" {
        if cli.limit.is_none() {
            warn!("Reading stdin without --limit; waiting for end of input");
        }
        Box::new(io::stdin().lock())
    } else {
        Box::new(File::open(&cli.file).map_err(|e| {
            format!("Cannot open {}: {}", cli.file.display(), e)
        })?)
    };
    let histogram = report(input, cli.limit, cli.with_values, io::stdout().lock())?;
    info!(
        "{} samples, mean {:.4}, std dev {:.4}",
        histogram.total(),
        histogram.mean(),
        histogram.variance().sqrt()
    );
    Ok(())
}

/// Count at most `limit` bytes of `input` and print the 256 counts to `out`.
fn report<R: Read, W: Write>(
    input: R,
    limit: Option<u64>,
    with_values: bool,
    out: W,
) -> io::Result<Histogram> {
    let mut input = input.take(limit.unwrap_or(u64::MAX));

    let mut histogram = Histogram::new();
    let mut buf = vec![0u8; READ_BLOCK];
    loop {
        let n = match input.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        histogram.merge(&Histogram::from_bytes_par(&buf[..n]));
        debug!("Counted {} bytes", histogram.total());
    }

    let mut out = BufWriter::new(out);
    for (value, count) in histogram.iter() {
        if with_values {
            writeln!(out, "{} {}", value, count)?;
        } else {
            writeln!(out, "{}", count)?;
        }
    }
    out.flush()?;
    Ok(histogram)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn lines(bytes: &[u8], limit: Option<u64>, with_values: bool) -> Vec<String> {
        let mut out = Vec::new();
        report(bytes, limit, with_values, &mut out).unwrap();
        String::from_utf8(out).unwrap().lines().map(str::to_owned).collect()
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn prints_one_count_per_value() {
        let out = lines(&[0x00, 0x00, 0xFF, 0x80, 0x7F], None, false);
        assert_eq!(out.len(), 256);
        // Line 0 is -128, line 127 is -1, line 128 is 0, line 255 is 127.
        assert_eq!(out[0], "1");
        assert_eq!(out[127], "1");
        assert_eq!(out[128], "2");
        assert_eq!(out[255], "1");
        let total: u64 = out.iter().map(|l| l.parse::<u64>().unwrap()).sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn values_flag_prefixes_each_line() {
        let out = lines(&[0xFE, 0xFE, 0x03], None, true);
        assert_eq!(out.len(), 256);
        assert_eq!(out[0], "-128 0");
        assert_eq!(out[126], "-2 2");
        assert_eq!(out[131], "3 1");
        assert_eq!(out[255], "127 0");
    }

    #[test]
    fn limit_truncates_input() {
        let data = vec![0x01u8; 10_000];
        let mut out = Vec::new();
        let histogram = report(&data[..], Some(1000), false, &mut out).unwrap();
        assert_eq!(histogram.total(), 1000);
        assert_eq!(histogram.count(1), 1000);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().nth(129), Some("1000"));
    }

    #[test]
    fn parses_limit_and_values_flags() {
        let cli = Cli::try_parse_from(["noise_histogram", "-l", "4096", "-x", "-q"]).unwrap();
        assert_eq!(cli.limit, Some(4096));
        assert!(cli.with_values);
        assert!(cli.quiet);
        assert_eq!(cli.file, PathBuf::from("-"));
    }
}
