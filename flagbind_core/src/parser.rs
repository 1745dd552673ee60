mod base;
mod printer;

pub use base::ParseError;
pub(crate) use base::{OptionMap, Parser, Strictness};
pub(crate) use printer::Printer;
