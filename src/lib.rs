//! White noise pre-equalized for a zero-order-hold DAC.
//!
//! A 64-bit maximal-length LFSR produces a bipolar bit stream. Each saved
//! register state holds the last 64 symbols, so a 64-tap inverse-sinc FIR
//! over that stream reduces to eight byte-indexed table lookups per state.
//! Samples are independent of one another and are filtered in parallel.
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::sync::atomic::AtomicBool;
//! use noisegen::{ByteTables, NoiseStream, StreamConfig, FIR_COEFFS, FIR_SHIFT};
//!
//! let tables = Arc::new(ByteTables::new(&FIR_COEFFS, FIR_SHIFT));
//! let mut stream = NoiseStream::new(&StreamConfig::default(), tables)?;
//! let cancel = AtomicBool::new(false);
//! stream.run(&mut std::io::stdout().lock(), &cancel, Some(8), None)?;
//! # Ok::<(), noisegen::NoiseError>(())
//! ```

pub mod byte_tables;
pub mod coeffs;
mod color_logger;
pub mod design;
pub mod dispatcher;
mod error;
pub mod histogram;
pub mod lfsr;
pub mod stream;

pub use byte_tables::{ByteTables, CoefficientVector};
pub use coeffs::{FIR_COEFFS, FIR_SHIFT};
pub use color_logger::ColorLogger;
pub use dispatcher::ParallelFilter;
pub use error::{NoiseError, NoiseResult, TermResult};
pub use histogram::Histogram;
pub use lfsr::Lfsr64;
pub use stream::{NoiseStream, ProgressUpdate, StreamConfig};
