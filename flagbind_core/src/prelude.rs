//! Traits which, typically, may be imported without concern: `use flagbind::prelude::*`.

pub use crate::api::{Bindable, Capturable};
