/// The outcome of probing an option when its flag is matched.
///
/// Tells the parser whether the option wants the following token as its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// The following token (if any) is the value of this option.
    NeedsValue,
    /// The option took effect by being matched; no value is consumed.
    Satisfied,
}

impl Probe {
    /// Whether a following token should be consumed.
    pub fn needs_value(&self) -> bool {
        matches!(self, Probe::NeedsValue)
    }
}

impl std::fmt::Display for Probe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
