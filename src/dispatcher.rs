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

use std::num::NonZeroUsize;
use std::ops::Range;
use std::sync::Arc;

use log::debug;

use crate::byte_tables::ByteTables;
use crate::error::NoiseResult;

/// Split `[0, len)` into `workers` contiguous ranges. The first `workers - 1`
/// have `len / workers` elements; the last one takes the remainder.
pub fn chunk_ranges(
    len: usize,
    workers: NonZeroUsize,
) -> impl Iterator<Item = Range<usize>> {
    let workers = workers.get();
    let chunk = len / workers;
    (0..workers).map(move |i| {
        let start = i * chunk;
        let end = if i + 1 == workers { len } else { start + chunk };
        start..end
    })
}

/// Runs [`ByteTables::filter_into`] over disjoint chunks of a buffer on a
/// dedicated pool of `workers` threads.
///
/// Samples have no cross-index dependency, so the output is identical for
/// every worker count.
pub struct ParallelFilter {
    tables: Arc<ByteTables>,
    workers: NonZeroUsize,
    pool: rayon::ThreadPool,
}

impl ParallelFilter {
    pub fn new(tables: Arc<ByteTables>, workers: NonZeroUsize) -> NoiseResult<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.get())
            .thread_name(|i| format!("noisegen-filter-{}", i))
            .build()?;
        debug!("Started filter pool with {} threads", workers);
        Ok(Self {
            tables,
            workers,
            pool,
        })
    }

    pub fn workers(&self) -> NonZeroUsize {
        self.workers
    }

    pub fn tables(&self) -> &Arc<ByteTables> {
        &self.tables
    }

    /// Filter `input` into `output`. Returns once every chunk is written.
    pub fn filter(&self, input: &[u64], output: &mut [i8]) {
        assert_eq!(
            input.len(),
            output.len(),
            "state and sample buffers must have the same length"
        );
        let tables: &ByteTables = &self.tables;
        let workers = self.workers;
        self.pool.scope(|s| {
            let mut rest = output;
            for range in chunk_ranges(input.len(), workers) {
                let (out, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
                rest = tail;
                if out.is_empty() {
                    continue;
                }
                let states = &input[range];
                s.spawn(move |_| tables.filter_into(states, out));
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coeffs::{FIR_COEFFS, FIR_SHIFT};
    use crate::lfsr::Lfsr64;

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn shared_tables() -> Arc<ByteTables> {
        Arc::new(ByteTables::new(&FIR_COEFFS, FIR_SHIFT))
    }

    #[test]
    fn uneven_split_puts_remainder_last() {
        let ranges: Vec<_> = chunk_ranges(100, nz(7)).collect();
        assert_eq!(ranges.len(), 7);
        for r in &ranges[..6] {
            assert_eq!(r.len(), 14);
        }
        assert_eq!(ranges[6], 84..100);
        assert_eq!(ranges[6].len(), 100 - 6 * (100 / 7));
    }

    #[test]
    fn ranges_are_contiguous_and_cover_everything() {
        for len in [0usize, 1, 5, 64, 1000, 1023] {
            for workers in [1usize, 2, 3, 7, 16] {
                let ranges: Vec<_> = chunk_ranges(len, nz(workers)).collect();
                assert_eq!(ranges.len(), workers);
                assert_eq!(ranges[0].start, 0);
                assert_eq!(ranges.last().unwrap().end, len);
                for pair in ranges.windows(2) {
                    assert_eq!(pair[0].end, pair[1].start);
                }
            }
        }
    }

    #[test]
    fn fewer_samples_than_workers() {
        let ranges: Vec<_> = chunk_ranges(3, nz(5)).collect();
        assert!(ranges[..4].iter().all(|r| r.is_empty()));
        assert_eq!(ranges[4], 0..3);
    }

    #[test]
    fn output_independent_of_worker_count() {
        let n = 250;
        let mut states = vec![0u64; n];
        Lfsr64::default().fill(&mut states);
        let tables = shared_tables();

        let mut reference = vec![0i8; n];
        tables.filter_into(&states, &mut reference);

        for workers in [1, 2, 3, 7, n] {
            let filter = ParallelFilter::new(tables.clone(), nz(workers)).unwrap();
            assert_eq!(filter.workers().get(), workers);
            assert!(Arc::ptr_eq(filter.tables(), &tables));
            let mut out = vec![0i8; n];
            filter.filter(&states, &mut out);
            assert_eq!(out, reference, "{} workers", workers);
        }
    }

    #[test]
    fn handles_remainder_and_tiny_buffers() {
        let tables = shared_tables();
        let filter = ParallelFilter::new(tables.clone(), nz(7)).unwrap();
        for n in [0usize, 1, 6, 100] {
            let states: Vec<u64> = Lfsr64::new(0x1234).take(n).collect();
            let mut out = vec![0x55i8; n];
            filter.filter(&states, &mut out);
            let expected: Vec<i8> = states.iter().map(|&s| tables.filter_one(s)).collect();
            assert_eq!(out, expected);
        }
    }
}
