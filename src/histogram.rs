use rayon::prelude::*;

const CHUNK: usize = 1 << 16;

/// Occurrence counts for every signed 8-bit sample value.
#[derive(Clone, PartialEq, Eq)]
pub struct Histogram {
    // counts[v + 128] for v in -128..=127
    counts: [u64; 256],
}

impl Default for Histogram {
    fn default() -> Self {
        Self { counts: [0; 256] }
    }
}

impl std::fmt::Debug for Histogram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Histogram")
            .field("total", &self.total())
            .field("mean", &self.mean())
            .finish()
    }
}

#[inline]
fn bin(value: i8) -> usize {
    (value as i16 + 128) as usize
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, samples: &[i8]) {
        for &s in samples {
            self.counts[bin(s)] += 1;
        }
    }

    /// Count raw sink bytes, reinterpreted as signed samples.
    pub fn add_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.counts[bin(b as i8)] += 1;
        }
    }

    pub fn merge(&mut self, other: &Histogram) {
        for (a, b) in self.counts.iter_mut().zip(other.counts.iter()) {
            *a += b;
        }
    }

    /// Histogram of `bytes`, counted in parallel on the global rayon pool.
    pub fn from_bytes_par(bytes: &[u8]) -> Self {
        bytes
            .par_chunks(CHUNK)
            .fold(Histogram::new, |mut h, chunk| {
                h.add_bytes(chunk);
                h
            })
            .reduce(Histogram::new, |mut a, b| {
                a.merge(&b);
                a
            })
    }

    pub fn count(&self, value: i8) -> u64 {
        self.counts[bin(value)]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// `(value, count)` from -128 up to 127.
    pub fn iter(&self) -> impl Iterator<Item = (i8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &c)| ((i as i16 - 128) as i8, c))
    }

    pub fn mean(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let sum: f64 = self.iter().map(|(v, c)| v as f64 * c as f64).sum();
        sum / total as f64
    }

    /// Population variance.
    pub fn variance(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let mean = self.mean();
        let sq: f64 = self
            .iter()
            .map(|(v, c)| {
                let d = v as f64 - mean;
                d * d * c as f64
            })
            .sum();
        sq / total as f64
    }
}
