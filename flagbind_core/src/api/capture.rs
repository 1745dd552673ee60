use std::path::PathBuf;
use thiserror::Error;

use crate::model::Probe;

/// Behaviour to parse and report a single bound variable, regardless of its type.
///
/// We use this at the top of the registry object graph so that options of different types may all live in one registry.
/// Each implementation keeps its own type `T` at the bottom of the graph, where the compiler can still see it.
pub trait Capturable {
    /// Declare that the flag has been matched.
    ///
    /// Returns [`Probe::NeedsValue`] when the following token should be passed to [`Capturable::capture`].
    /// Self-contained options take effect here and return [`Probe::Satisfied`].
    fn probe(&mut self) -> Probe;

    /// Capture a value from the token into the bound variable.
    ///
    /// On error the bound variable keeps its previous value.
    fn capture(&mut self, token: &str) -> Result<(), CaptureError>;

    /// A diagnostic label for the type of the bound variable.
    fn type_name(&self) -> &'static str;

    /// The current value of the bound variable, rendered as text.
    fn value(&self) -> String;
}

/// Behaviour to pick the option variant for a type of bound variable.
///
/// This is what lets [`OptionRegistry::make`](crate::OptionRegistry::make) accept a plain `&mut` reference.
///
/// ### Example
/// ```
/// # use flagbind_core as flagbind;
/// use flagbind::prelude::*;
/// use flagbind::{OptionRegistry, Scalar};
/// use std::str::FromStr;
///
/// #[derive(Debug, PartialEq)]
/// struct Level(u8);
///
/// impl FromStr for Level {
///     type Err = std::num::ParseIntError;
///     fn from_str(s: &str) -> Result<Self, Self::Err> {
///         Ok(Level(u8::from_str(s)?))
///     }
/// }
///
/// impl std::fmt::Display for Level {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         write!(f, "L{}", self.0)
///     }
/// }
///
/// impl<'a> Bindable<'a> for Level {
///     fn bind(variable: &'a mut Self) -> Box<dyn Capturable + 'a> {
///         Box::new(Scalar::new(variable))
///     }
/// }
///
/// let mut level = Level(0);
/// let mut registry = OptionRegistry::new().make(&mut level, "level");
/// registry.parse_tokens(&["program", "-level", "3"]);
/// drop(registry);
///
/// assert_eq!(level, Level(3));
/// ```
pub trait Bindable<'a> {
    /// Wrap the variable in its option variant.
    fn bind(variable: &'a mut Self) -> Box<dyn Capturable + 'a>;
}

/// The reasons an option may fail to capture a token.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The token could not be converted to the bound type.
    #[error("cannot convert '{token}' to {type_name}.")]
    InvalidConversion {
        /// The offending token.
        token: String,
        /// The bound type.
        type_name: &'static str,
    },
    /// The file sink could not open its path for writing.
    #[error("cannot open '{}' for writing: {source}.", .path.display())]
    OpenFailed {
        /// The path from the token.
        path: PathBuf,
        /// The underlying io error.
        #[source]
        source: std::io::Error,
    },
}
