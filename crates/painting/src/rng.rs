//! Small seedable PCG32 generator for sprinkle placement

const PCG_MULT: u64 = 6364136223846793005;
const PCG_INIT: u64 = 0x853c49e6748fea9b;

#[derive(Debug, Clone)]
pub(crate) struct Pcg32 {
    state: u64,
    inc: u64,
}

impl Pcg32 {
    pub(crate) fn new(seed: u64) -> Self {
        let mut rng = Self { state: 0, inc: 1 };
        rng.next_u32();
        rng.state = rng.state.wrapping_add(PCG_INIT.wrapping_add(seed));
        rng.next_u32();
        rng
    }

    pub(crate) fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.state = old.wrapping_mul(PCG_MULT).wrapping_add(self.inc | 1);
        let xorshifted = (((old >> 18) ^ old) >> 27) as u32;
        let rot = (old >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    /// Uniform in [0, 1)
    pub(crate) fn next_f32(&mut self) -> f32 {
        let bits = (self.next_u32() >> 9) | 0x3f800000;
        f32::from_bits(bits) - 1.0
    }

    /// Uniform integer in `lo..=hi`
    pub(crate) fn range_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        lo + self.next_u32() % (hi - lo + 1)
    }

    /// Uniform index into a collection of `len` items (`len > 0`)
    pub(crate) fn index(&mut self, len: usize) -> usize {
        (self.next_u32() as usize) % len.max(1)
    }
}
