pub use layout::Layout;
pub use strand_mode::StrandMode;

mod layout;
mod strand_mode;
