pub mod format;
pub mod pagination;

pub use format::*;
pub use pagination::*;
