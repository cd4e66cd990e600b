// ============================================================================
// ByteTables
// Table-lookup multiply-accumulate for a 64-tap FIR driven by a bipolar bit
// stream. Every input symbol is +1 or -1, so the full convolution is the sum
// of 64 sign-selected coefficients. The sum splits per byte of the shift
// register state: table i, indexed by byte i, holds the partial sum of taps
// 8i..8i+7. One output sample costs 8 lookups and 8 adds, no branches.
//
// Byte i of a state is always (state >> 8i) & 0xFF, whatever the host
// endianness.
// ============================================================================

use log::debug;

/// Taps in one coefficient vector; one per bit of the LFSR state.
pub const NUM_TAPS: usize = 64;
/// One table per byte of the state word.
pub const NUM_TABLES: usize = NUM_TAPS / 8;

pub type CoefficientVector = [i32; NUM_TAPS];

#[derive(Clone)]
pub struct ByteTables {
    // tables[i][byte] gives the partial sum for byte position i
    tables: Box<[[i32; 256]; NUM_TABLES]>,
    shift: u32,
}

impl ByteTables {
    /// Precompute the 8 x 256 partial sums for `coeffs`.
    ///
    /// Panics if `shift >= 32`; the shift is a build-time constant.
    pub fn new(coeffs: &CoefficientVector, shift: u32) -> Self {
        assert!(shift < 32, "output shift {} out of range for i32 sums", shift);
        let mut tables = Box::new([[0i32; 256]; NUM_TABLES]);
        for (t, table) in tables.iter_mut().enumerate() {
            let base = t * 8;
            for (byte, entry) in table.iter_mut().enumerate() {
                let mut acc = 0i32;
                for bit in 0..8 {
                    let c = coeffs[base + bit];
                    // Map 0 -> -1, 1 -> +1
                    acc = if (byte >> bit) & 1 != 0 {
                        acc.wrapping_add(c)
                    } else {
                        acc.wrapping_sub(c)
                    };
                }
                *entry = acc;
            }
        }
        debug!(
            "Built {} byte tables ({} entries), output shift {}",
            NUM_TABLES,
            NUM_TABLES * 256,
            shift
        );
        Self { tables, shift }
    }

    pub fn shift(&self) -> u32 {
        self.shift
    }

    /// The 256 partial sums for byte position `pos` (0 = least significant).
    pub fn table(&self, pos: usize) -> &[i32; 256] {
        &self.tables[pos]
    }

    /// Filter sum for one state before shifting and narrowing.
    #[inline(always)]
    pub fn accumulate(&self, state: u64) -> i32 {
        let mut acc = 0i32;
        for (i, table) in self.tables.iter().enumerate() {
            let byte = (state >> (8 * i)) as u8;
            acc = acc.wrapping_add(table[byte as usize]);
        }
        acc
    }

    /// One output sample: arithmetic shift, then wrap to 8 bits.
    ///
    /// The narrowing is modulo 256 (a sum of 128 at shift 0 gives -128),
    /// never a clamp.
    #[inline(always)]
    pub fn filter_one(&self, state: u64) -> i8 {
        (self.accumulate(state) >> self.shift) as i8
    }

    /// Filter `states` into `out`, index for index.
    pub fn filter_into(&self, states: &[u64], out: &mut [i8]) {
        assert_eq!(
            states.len(),
            out.len(),
            "state and sample buffers must have the same length"
        );
        for (sample, &state) in out.iter_mut().zip(states) {
            *sample = self.filter_one(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn direct_sum(coeffs: &CoefficientVector, state: u64) -> i64 {
        (0..NUM_TAPS)
            .map(|k| {
                let c = coeffs[k] as i64;
                if (state >> k) & 1 == 1 { c } else { -c }
            })
            .sum()
    }

    fn random_coeffs(rng: &mut StdRng) -> CoefficientVector {
        let mut coeffs = [0i32; NUM_TAPS];
        for c in coeffs.iter_mut() {
            *c = rng.gen_range(-(1 << 24)..=(1 << 24));
        }
        coeffs
    }

    #[test]
    fn lookup_matches_direct_convolution() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..20 {
            let coeffs = random_coeffs(&mut rng);
            let tables = ByteTables::new(&coeffs, 0);
            for _ in 0..500 {
                let state: u64 = rng.r#gen();
                assert_eq!(tables.accumulate(state) as i64, direct_sum(&coeffs, state));
            }
        }
    }

    #[test]
    fn entries_are_antisymmetric_under_complement() {
        let mut rng = StdRng::seed_from_u64(7);
        let tables = ByteTables::new(&random_coeffs(&mut rng), 3);
        for pos in 0..NUM_TABLES {
            let table = tables.table(pos);
            for j in 0..256 {
                assert_eq!(table[j], -table[255 - j], "table {} entry {}", pos, j);
            }
        }
    }

    #[test]
    fn byte_zero_is_least_significant() {
        let mut coeffs = [0i32; NUM_TAPS];
        coeffs[0] = 1000;
        let tables = ByteTables::new(&coeffs, 0);
        // Only tap 0 is nonzero, so only bit 0 of the state matters.
        assert_eq!(tables.accumulate(0x1), 1000);
        assert_eq!(tables.accumulate(0x0), -1000);
        assert_eq!(tables.accumulate(1 << 56), -1000);
        assert_eq!(tables.table(0)[1], 1000);
        assert_eq!(tables.table(7)[1], 0);
    }

    #[test]
    fn narrowing_wraps_instead_of_saturating() {
        let mut coeffs = [0i32; NUM_TAPS];
        coeffs[0] = 64;
        coeffs[1] = 63;
        let tables = ByteTables::new(&coeffs, 0);
        assert_eq!(tables.filter_one(0b11), 127);

        coeffs[1] = 64;
        let tables = ByteTables::new(&coeffs, 0);
        assert_eq!(tables.accumulate(0b11), 128);
        assert_eq!(tables.filter_one(0b11), -128);
        assert_eq!(tables.filter_one(0b00), -128);
    }

    #[test]
    fn shift_is_arithmetic() {
        let mut coeffs = [0i32; NUM_TAPS];
        coeffs[5] = 1 << 10;
        let tables = ByteTables::new(&coeffs, 4);
        assert_eq!(tables.shift(), 4);
        assert_eq!(tables.accumulate(1 << 5), 1 << 10);
        assert_eq!(tables.filter_one(1 << 5), 64);
        assert_eq!(tables.filter_one(0), -64);

        coeffs[5] = 3;
        let tables = ByteTables::new(&coeffs, 1);
        // -3 >> 1 rounds toward negative infinity.
        assert_eq!(tables.filter_one(0), -2);
    }

    #[test]
    fn filter_into_is_per_sample() {
        let mut rng = StdRng::seed_from_u64(99);
        let tables = ByteTables::new(&random_coeffs(&mut rng), 20);
        let states: Vec<u64> = (0..257).map(|_| rng.r#gen()).collect();
        let mut out = vec![0i8; states.len()];
        tables.filter_into(&states, &mut out);
        for (&s, &o) in states.iter().zip(&out) {
            assert_eq!(o, tables.filter_one(s));
        }
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn rejects_wide_shift() {
        ByteTables::new(&[0; NUM_TAPS], 32);
    }
}
