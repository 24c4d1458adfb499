pub use memory::{InMemory, InMemoryStream};
pub use record::{Alignment, AlignmentRecord};
pub use stream::{AlignmentSource, AlignmentStream};

mod memory;
mod record;
mod stream;
