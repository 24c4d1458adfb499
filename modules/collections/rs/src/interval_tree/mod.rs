pub use bits::{Bits, BitsBuilder};
pub use tree::{Builder, ITree};

mod bits;
mod tree;

#[cfg(test)]
pub(crate) mod test_stand;
