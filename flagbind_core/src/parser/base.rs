use std::collections::BTreeMap;
use thiserror::Error;

use crate::api::{CaptureError, Capturable};
use crate::constant::FLAG_MARKER;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

// We need a (dyn .. [ignoring T] ..) here in order to put all the options of varying types T under one collection.
// In other words, we want the bottom of the object graph to include the types T, but up here we want to work across all T.
pub(crate) type OptionMap<'a> = BTreeMap<String, Box<dyn Capturable + 'a>>;

/// An anomaly encountered while parsing flags.
///
/// Only reported by [`OptionRegistry::try_parse_tokens`](crate::OptionRegistry::try_parse_tokens).
#[derive(Debug, Error)]
pub enum ParseError {
    /// A marker-prefixed token names no registered option.
    #[error("unknown flag '-{name}' at offset {offset}.")]
    UnknownFlag {
        /// The flag name, without the marker.
        name: String,
        /// The index of the flag token.
        offset: usize,
    },
    /// The last token is a flag that expects a value.
    #[error("flag '-{name}' at offset {offset} expects a value.")]
    MissingValue {
        /// The flag name, without the marker.
        name: String,
        /// The index of the flag token.
        offset: usize,
    },
    /// The option rejected its value.
    #[error("invalid value at offset {offset}: {source}")]
    Capture {
        /// The index of the value token.
        offset: usize,
        /// Why the option rejected it.
        #[source]
        source: CaptureError,
    },
}

/// How the parser treats anomalies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Strictness {
    /// Skip over anomalies and keep going.
    BestEffort,
    /// Stop at the first anomaly.
    Strict,
}

impl Strictness {
    fn reject(&self, error: ParseError) -> Result<(), ParseError> {
        match self {
            Strictness::BestEffort => {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Ignoring: {error}");
                }

                Ok(())
            }
            Strictness::Strict => Err(error),
        }
    }
}

pub(crate) struct Parser<'r, 'a> {
    options: &'r mut OptionMap<'a>,
    strictness: Strictness,
}

impl<'r, 'a> std::fmt::Debug for Parser<'r, 'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser{..}")
            .field("strictness", &self.strictness)
            .finish()
    }
}

impl<'r, 'a> Parser<'r, 'a> {
    pub(crate) fn new(options: &'r mut OptionMap<'a>, strictness: Strictness) -> Self {
        Self {
            options,
            strictness,
        }
    }

    /// Walk the flags at the front of the tokens, driving the matched options.
    ///
    /// The token at index 0 is the program name and is never examined.
    /// Returns the index of the first token that was not consumed.
    pub(crate) fn consume(self, tokens: &[impl AsRef<str>]) -> Result<usize, ParseError> {
        let Parser {
            options,
            strictness,
        } = self;
        let mut index = std::cmp::min(1, tokens.len());

        while index < tokens.len() {
            let name = match tokens[index].as_ref().strip_prefix(FLAG_MARKER) {
                Some(name) => name,
                // The operands start here.
                None => break,
            };

            match options.get_mut(name) {
                Some(option) => {
                    if option.probe().needs_value() {
                        match tokens.get(index + 1) {
                            Some(value) => {
                                let value: &str = value.as_ref();
                                #[cfg(feature = "tracing_debug")]
                                {
                                    debug!("Capturing '{value}' for flag '{name}'.");
                                }

                                if let Err(source) = option.capture(value) {
                                    strictness.reject(ParseError::Capture {
                                        offset: index + 1,
                                        source,
                                    })?;
                                }

                                index += 2;
                            }
                            None => {
                                strictness.reject(ParseError::MissingValue {
                                    name: name.to_string(),
                                    offset: index,
                                })?;
                                index += 1;
                            }
                        }
                    } else {
                        index += 1;
                    }
                }
                None => {
                    strictness.reject(ParseError::UnknownFlag {
                        name: name.to_string(),
                        offset: index,
                    })?;
                    index += 1;
                }
            }
        }

        Ok(index)
    }
}

#[cfg(test)]
pub(crate) mod test {
    use crate::api::{CaptureError, Capturable};
    use crate::model::Probe;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every call made on it, for asserting the parser's protocol.
    pub(crate) struct Recorder {
        probe: Probe,
        calls: Rc<RefCell<Vec<String>>>,
    }

    impl Recorder {
        pub(crate) fn new(probe: Probe) -> (Self, Rc<RefCell<Vec<String>>>) {
            let calls = Rc::new(RefCell::new(Vec::default()));
            (
                Self {
                    probe,
                    calls: calls.clone(),
                },
                calls,
            )
        }
    }

    impl Capturable for Recorder {
        fn probe(&mut self) -> Probe {
            self.calls.borrow_mut().push("probe".to_string());
            self.probe
        }

        fn capture(&mut self, token: &str) -> Result<(), CaptureError> {
            self.calls.borrow_mut().push(format!("capture {token}"));
            Ok(())
        }

        fn type_name(&self) -> &'static str {
            "recorder"
        }

        fn value(&self) -> String {
            "recorded".to_string()
        }
    }
}
