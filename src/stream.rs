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

use std::io::Write;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;

use log::{debug, trace};

use crate::byte_tables::ByteTables;
use crate::dispatcher::ParallelFilter;
use crate::error::{NoiseError, NoiseResult};
use crate::lfsr::{DEFAULT_SEED, Lfsr64};

pub const DEFAULT_THREADS: usize = 4;
pub const DEFAULT_BUFFER_LOG2: u32 = 17;
pub const MAX_BUFFER_LOG2: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    pub threads: NonZeroUsize,
    /// Samples per block = 2^buffer_log2.
    pub buffer_log2: u32,
    pub seed: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            threads: NonZeroUsize::new(DEFAULT_THREADS).unwrap_or(NonZeroUsize::MIN),
            buffer_log2: DEFAULT_BUFFER_LOG2,
            seed: DEFAULT_SEED,
        }
    }
}

impl StreamConfig {
    pub fn validate(&self) -> NoiseResult<()> {
        if self.buffer_log2 > MAX_BUFFER_LOG2 {
            return Err(NoiseError::Config(format!(
                "buffer log2 must be at most {}, got {}",
                MAX_BUFFER_LOG2, self.buffer_log2
            )));
        }
        if self.seed == 0 {
            return Err(NoiseError::Config(
                "seed must be nonzero; a zero register never leaves zero".into(),
            ));
        }
        Ok(())
    }

    pub fn buffer_size(&self) -> usize {
        1usize << self.buffer_log2
    }
}

/// Sent after every block written by [`NoiseStream::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub blocks: u64,
    pub bytes: u64,
}

/// Generate, filter, emit. Only the LFSR register carries over between
/// blocks; all three buffers are preallocated and overwritten every pass.
pub struct NoiseStream {
    lfsr: Lfsr64,
    filter: ParallelFilter,
    states: Vec<u64>,
    samples: Vec<i8>,
    stdout_buf: Vec<u8>,
}

impl NoiseStream {
    pub fn new(config: &StreamConfig, tables: Arc<ByteTables>) -> NoiseResult<Self> {
        config.validate()?;
        let size = config.buffer_size();
        let filter = ParallelFilter::new(tables, config.threads)?;
        debug!(
            "Stream ready: {} samples per block, {} threads, seed {:#x}",
            size, config.threads, config.seed
        );
        Ok(Self {
            lfsr: Lfsr64::new(config.seed),
            filter,
            states: vec![0; size],
            samples: vec![0; size],
            stdout_buf: vec![0; size],
        })
    }

    pub fn block_len(&self) -> usize {
        self.samples.len()
    }

    pub fn lfsr(&self) -> &Lfsr64 {
        &self.lfsr
    }

    /// Produce the next block of samples.
    pub fn next_block(&mut self) -> &[i8] {
        self.lfsr.fill(&mut self.states);
        self.filter.filter(&self.states, &mut self.samples);
        &self.samples
    }

    /// Write blocks to `sink` until `cancel` is set or `max_blocks` have
    /// been written. Returns the number of blocks written.
    ///
    /// Each block is flushed before the next is generated, so a slow sink
    /// throttles the generator. Any write error ends the run.
    pub fn run<W: Write>(
        &mut self,
        sink: &mut W,
        cancel: &AtomicBool,
        max_blocks: Option<u64>,
        progress: Option<Sender<ProgressUpdate>>,
    ) -> NoiseResult<u64> {
        let mut blocks = 0u64;
        let mut bytes = 0u64;
        while !cancel.load(Ordering::Relaxed) && max_blocks.is_none_or(|max| blocks < max) {
            self.next_block();
            for (byte, &sample) in self.stdout_buf.iter_mut().zip(&self.samples) {
                *byte = sample as u8;
            }
            sink.write_all(&self.stdout_buf)?;
            sink.flush()?;

            blocks += 1;
            bytes += self.stdout_buf.len() as u64;
            trace!("Wrote block {} ({} bytes total)", blocks, bytes);
            if let Some(tx) = &progress {
                // The progress reader may already have gone away.
                let _ = tx.send(ProgressUpdate { blocks, bytes });
            }
        }
        debug!("Stream stopped after {} blocks", blocks);
        Ok(blocks)
    }
}
