use std::io::{self, Write};

use crate::constant::*;
use crate::parser::OptionMap;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Renders the diagnostic table of options: name, current value, type.
pub(crate) struct Printer<'r, 'a> {
    options: &'r OptionMap<'a>,
}

impl<'r, 'a> Printer<'r, 'a> {
    pub(crate) fn new(options: &'r OptionMap<'a>) -> Self {
        Self { options }
    }

    /// The table rows, header first.
    pub(crate) fn rows(&self) -> Vec<String> {
        let mut rows = Vec::with_capacity(self.options.len() + 1);
        rows.push(TABLE_HEADER.join(COLUMN_SEPARATOR));

        for (name, option) in self.options.iter() {
            rows.push(
                [name.as_str(), option.value().as_str(), option.type_name()]
                    .join(COLUMN_SEPARATOR),
            );
        }

        rows
    }

    pub(crate) fn write_table(&self, out: &mut (impl Write + ?Sized)) -> io::Result<()> {
        #[cfg(feature = "tracing_debug")]
        {
            debug!("Writing table of {} options.", self.options.len());
        }

        for row in self.rows() {
            writeln!(out, "{row}")?;
        }

        Ok(())
    }
}
