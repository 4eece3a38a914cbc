/// Invoke the generic function `$f` once per tree strategy, each holding
/// `u16` keys and `usize` values.
macro_rules! for_each_strategy {
    ($f:ident($($arg:expr),*)) => {
        $f::<arboretum::BinaryTree<u16, usize>, _>($($arg),*);
        $f::<arboretum::AvlTree<u16, usize>, _>($($arg),*);
        $f::<arboretum::RbTree<u16, usize>, _>($($arg),*);
        $f::<arboretum::SplayTree<u16, usize>, _>($($arg),*);
    };
}

mod find;
mod insert;
mod iter;

use criterion::{criterion_group, criterion_main};

criterion_main!(benches);
criterion_group!(benches, insert::bench, find::bench, iter::bench);

/// Linear-feedback shift register based PRNG.
///
/// Generates 65,535 unique values before cycling.
#[derive(Debug, Clone)]
pub struct Lfsr(u16);

impl Default for Lfsr {
    fn default() -> Self {
        Self(42)
    }
}

impl Lfsr {
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> u16 {
        let lsb = self.0 & 1;
        self.0 >>= 1;
        if lsb == 1 {
            self.0 ^= 0xD008;
        }
        assert_ne!(self.0, 42, "LFSR rollover");
        self.0
    }
}
