pub(crate) const FLAG_MARKER: char = '-';
pub(crate) const FILE_SENTINEL: &str = "file";
pub(crate) const TABLE_HEADER: [&str; 3] = ["option", "default", "type"];
pub(crate) const COLUMN_SEPARATOR: &str = "\t";
