use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use crate::api::capture::*;
use crate::api::file::OutputFile;
use crate::constant::FILE_SENTINEL;
use crate::model::Probe;

/// An option that takes a single value, converted via [`FromStr`].
///
/// Use this directly with [`OptionRegistry::add`](crate::OptionRegistry::add) for types that do not implement [`Bindable`].
pub struct Scalar<'a, T> {
    variable: &'a mut T,
}

impl<'a, T> Scalar<'a, T> {
    /// Create a scalar option.
    pub fn new(variable: &'a mut T) -> Self {
        Self { variable }
    }
}

impl<'a, T> Capturable for Scalar<'a, T>
where
    T: FromStr + Display,
{
    fn probe(&mut self) -> Probe {
        Probe::NeedsValue
    }

    fn capture(&mut self, token: &str) -> Result<(), CaptureError> {
        let value = T::from_str(token).map_err(|_| CaptureError::InvalidConversion {
            token: token.to_string(),
            type_name: std::any::type_name::<T>(),
        })?;
        *self.variable = value;
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn value(&self) -> String {
        self.variable.to_string()
    }
}

/// An option that takes no value; matching the flag sets the `bool` to `true`.
pub struct Switch<'a> {
    variable: &'a mut bool,
}

impl<'a> Switch<'a> {
    /// Create a switch option.
    pub fn new(variable: &'a mut bool) -> Self {
        Self { variable }
    }
}

impl<'a> Capturable for Switch<'a> {
    fn probe(&mut self) -> Probe {
        *self.variable = true;
        Probe::Satisfied
    }

    fn capture(&mut self, _token: &str) -> Result<(), CaptureError> {
        // The parser never hands a switch a value.
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<bool>()
    }

    fn value(&self) -> String {
        self.variable.to_string()
    }
}

/// An option that takes a single value, assigned verbatim.
pub struct Text<'a> {
    variable: &'a mut String,
}

impl<'a> Text<'a> {
    /// Create a text option.
    pub fn new(variable: &'a mut String) -> Self {
        Self { variable }
    }
}

impl<'a> Capturable for Text<'a> {
    fn probe(&mut self) -> Probe {
        Probe::NeedsValue
    }

    fn capture(&mut self, token: &str) -> Result<(), CaptureError> {
        self.variable.clear();
        self.variable.push_str(token);
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<String>()
    }

    fn value(&self) -> String {
        self.variable.clone()
    }
}

/// An option that takes a path, and opens the bound [`OutputFile`] there for writing.
///
/// The path is not retained; the reported value is always `file`.
pub struct FileSink<'a> {
    variable: &'a mut OutputFile,
}

impl<'a> FileSink<'a> {
    /// Create a file sink option.
    pub fn new(variable: &'a mut OutputFile) -> Self {
        Self { variable }
    }
}

impl<'a> Capturable for FileSink<'a> {
    fn probe(&mut self) -> Probe {
        Probe::NeedsValue
    }

    fn capture(&mut self, token: &str) -> Result<(), CaptureError> {
        self.variable
            .open(token)
            .map_err(|source| CaptureError::OpenFailed {
                path: PathBuf::from(token),
                source,
            })
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<OutputFile>()
    }

    fn value(&self) -> String {
        FILE_SENTINEL.to_string()
    }
}

impl<'a> Bindable<'a> for bool {
    fn bind(variable: &'a mut Self) -> Box<dyn Capturable + 'a> {
        Box::new(Switch::new(variable))
    }
}

impl<'a> Bindable<'a> for String {
    fn bind(variable: &'a mut Self) -> Box<dyn Capturable + 'a> {
        Box::new(Text::new(variable))
    }
}

impl<'a> Bindable<'a> for OutputFile {
    fn bind(variable: &'a mut Self) -> Box<dyn Capturable + 'a> {
        Box::new(FileSink::new(variable))
    }
}

macro_rules! scalar_bindable {
    ($($t:ty),* $(,)?) => {
        $(
            impl<'a> Bindable<'a> for $t {
                fn bind(variable: &'a mut Self) -> Box<dyn Capturable + 'a> {
                    Box::new(Scalar::new(variable))
                }
            }
        )*
    };
}

scalar_bindable!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, char,
);
