mod capture;
mod core;
mod field;
mod file;

pub use self::core::*;
pub use capture::*;
pub use field::*;
pub use file::*;
