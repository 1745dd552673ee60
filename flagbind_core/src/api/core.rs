use std::env;
use std::io::{self, Write};

use crate::api::{Bindable, Capturable};
use crate::parser::{OptionMap, ParseError, Parser, Printer, Strictness};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// The registry of options, keyed by flag name.
///
/// Each option borrows its variable for `'a`, so the registry cannot outlive the variables it fills in.
/// Drop the registry (or let it go out of scope) to read the variables again.
///
/// ### Example
/// ```
/// # use flagbind_core as flagbind;
/// use flagbind::{OptionRegistry, OutputFile};
///
/// let mut test = String::default();
/// let mut yesno = false;
/// let mut param: f64 = 100.0;
/// let mut log = OutputFile::default();
/// let mut registry = OptionRegistry::new()
///     .make(&mut test, "t")
///     .make(&mut yesno, "y")
///     .make(&mut param, "p")
///     .make(&mut log, "l");
///
/// let operands = registry.parse_tokens(&["program", "-t", "hello", "-y", "-p", "2.5", "input.txt"]);
/// drop(registry);
///
/// assert_eq!(operands, 6);
/// assert_eq!(&test, "hello");
/// assert!(yesno);
/// assert_eq!(param, 2.5);
/// assert!(!log.is_open());
/// ```
pub struct OptionRegistry<'a> {
    options: OptionMap<'a>,
}

impl<'a> std::fmt::Debug for OptionRegistry<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionRegistry")
            .field("names", &self.options.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<'a> Default for OptionRegistry<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> OptionRegistry<'a> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            options: OptionMap::default(),
        }
    }

    /// Bind a variable to the flag `name` (given without the leading `-`).
    ///
    /// The option variant is picked from the variable's type (see [`Bindable`]).
    /// If `name` is already registered, the previous option is dropped and replaced.
    ///
    /// ### Example
    /// ```
    /// # use flagbind_core as flagbind;
    /// use flagbind::OptionRegistry;
    ///
    /// let mut first: u32 = 0;
    /// let mut second: u32 = 0;
    /// let mut registry = OptionRegistry::new()
    ///     .make(&mut first, "n")
    ///     .make(&mut second, "n");
    ///
    /// registry.parse_tokens(&["program", "-n", "5"]);
    /// drop(registry);
    ///
    /// assert_eq!(first, 0);
    /// assert_eq!(second, 5);
    /// ```
    pub fn make<B>(self, variable: &'a mut B, name: impl Into<String>) -> Self
    where
        B: Bindable<'a>,
    {
        let option = B::bind(variable);
        self.insert(name.into(), option)
    }

    /// Add an explicitly constructed option under the flag `name` (given without the leading `-`).
    ///
    /// Use this for variables whose type does not implement [`Bindable`].
    /// If `name` is already registered, the previous option is dropped and replaced.
    ///
    /// ### Example
    /// ```
    /// # use flagbind_core as flagbind;
    /// use flagbind::{OptionRegistry, Scalar};
    /// use std::net::Ipv4Addr;
    ///
    /// let mut address = Ipv4Addr::LOCALHOST;
    /// let mut registry = OptionRegistry::new().add("address", Scalar::new(&mut address));
    ///
    /// registry.parse_tokens(&["program", "-address", "10.0.0.1"]);
    /// drop(registry);
    ///
    /// assert_eq!(address, Ipv4Addr::new(10, 0, 0, 1));
    /// ```
    pub fn add(self, name: impl Into<String>, option: impl Capturable + 'a) -> Self {
        self.insert(name.into(), Box::new(option))
    }

    fn insert(mut self, name: String, option: Box<dyn Capturable + 'a>) -> Self {
        #[cfg(feature = "tracing_debug")]
        {
            if self.options.contains_key(&name) {
                debug!("Replacing the option for flag '{name}'.");
            }
        }

        self.options.insert(name, option);
        self
    }

    /// The number of registered flags.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Whether no flags are registered.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Whether the flag `name` (given without the leading `-`) is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    /// The registered flag names, in table order.
    pub fn names(&self) -> Vec<&str> {
        self.options.keys().map(String::as_str).collect()
    }

    /// The current value of the variable bound to the flag `name`, rendered as text.
    pub fn value(&self, name: &str) -> Option<String> {
        self.options.get(name).map(|option| option.value())
    }

    /// Parse the flags at the front of `argv`, filling in the bound variables.
    ///
    /// `argv[0]` is the program name and is skipped.
    /// Parsing walks `-name [value]` pairs and stops at the first token that does not start with `-`, or at the end of the input.
    /// Returns the index of that first unconsumed token, so the caller can pick up its operands from there.
    ///
    /// Anomalies never stop the walk:
    /// * An unknown flag is skipped.
    /// * A trailing flag with no value leaves its variable unchanged.
    /// * A value that does not convert leaves its variable unchanged.
    /// * A file that does not open leaves its [`OutputFile`](crate::OutputFile) in the failed state.
    ///
    /// Use [`OptionRegistry::try_parse_tokens`] to have these reported instead.
    pub fn parse_tokens(&mut self, argv: &[impl AsRef<str>]) -> usize {
        match Parser::new(&mut self.options, Strictness::BestEffort).consume(argv) {
            Ok(index) => index,
            Err(_) => unreachable!("internal error - best effort parsing must not reject"),
        }
    }

    /// Parse the flags at the front of `argv`, stopping at the first anomaly.
    ///
    /// Follows the same walk as [`OptionRegistry::parse_tokens`].
    /// Variables captured before the anomaly keep their new values.
    ///
    /// ### Example
    /// ```
    /// # use flagbind_core as flagbind;
    /// use flagbind::{OptionRegistry, ParseError};
    ///
    /// let mut count: u32 = 0;
    /// let mut registry = OptionRegistry::new().make(&mut count, "count");
    ///
    /// let error = registry
    ///     .try_parse_tokens(&["program", "-count", "many"])
    ///     .unwrap_err();
    ///
    /// assert!(matches!(error, ParseError::Capture { offset: 2, .. }));
    /// ```
    pub fn try_parse_tokens(&mut self, argv: &[impl AsRef<str>]) -> Result<usize, ParseError> {
        Parser::new(&mut self.options, Strictness::Strict).consume(argv)
    }

    /// Parse the flags of the program's [`env::args`].
    ///
    /// See [`OptionRegistry::parse_tokens`].
    pub fn parse(&mut self) -> usize {
        let argv: Vec<String> = env::args().collect();
        self.parse_tokens(&argv)
    }

    /// *Available using 'unit_test' crate feature only.*</br></br>
    /// Parse flag tokens that do not include a program name.
    ///
    /// Returns the index of the first unconsumed token, relative to `tokens`.
    ///
    /// ### Example
    /// ```
    /// # use flagbind_core as flagbind;
    /// use flagbind::OptionRegistry;
    ///
    /// let mut verbose = false;
    /// let mut registry = OptionRegistry::new().make(&mut verbose, "v");
    /// assert_eq!(registry.test_tokens(&["-v", "rest"]), 1);
    /// drop(registry);
    /// assert!(verbose);
    /// ```
    #[cfg(feature = "unit_test")]
    pub fn test_tokens(&mut self, tokens: &[&str]) -> usize {
        let mut argv = Vec::with_capacity(tokens.len() + 1);
        argv.push("test-dummy");
        argv.extend_from_slice(tokens);
        self.parse_tokens(&argv) - 1
    }

    /// Write the diagnostic table to `out`.
    ///
    /// The table is tab separated, with the header `option\tdefault\ttype` and then one row per flag, in name order.
    /// Each row shows the variable's value at the time of the call.
    ///
    /// ### Example
    /// ```
    /// # use flagbind_core as flagbind;
    /// use flagbind::OptionRegistry;
    ///
    /// let mut yesno = false;
    /// let mut registry = OptionRegistry::new().make(&mut yesno, "y");
    /// let mut out: Vec<u8> = Vec::default();
    /// registry.write_table(&mut out).unwrap();
    ///
    /// assert_eq!(String::from_utf8(out).unwrap(), "option\tdefault\ttype\ny\tfalse\tbool\n");
    /// ```
    pub fn write_table(&self, out: &mut (impl Write + ?Sized)) -> io::Result<()> {
        Printer::new(&self.options).write_table(out)
    }

    /// Print the diagnostic table to standard output.
    ///
    /// See [`OptionRegistry::write_table`].
    pub fn print(&self) {
        let stdout = io::stdout();
        let mut handle = stdout.lock();

        if let Err(_error) = self.write_table(&mut handle) {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Failed to print the option table: {_error}");
            }
        }
    }
}

impl<'a> std::fmt::Display for OptionRegistry<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in Printer::new(&self.options).rows() {
            writeln!(f, "{row}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{OutputFile, Scalar};
    use crate::test::assert_contains;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case("0", 0)]
    #[case("42", 42)]
    #[case("-42", -42)]
    #[case("2147483647", i32::MAX)]
    fn round_trip(#[case] token: &str, #[case] expected: i32) {
        // Setup
        let mut variable: i32 = 1;
        let mut registry = OptionRegistry::new().make(&mut variable, "name");

        // Execute
        let index = registry.parse_tokens(&["program", "-name", token]);

        // Verify
        assert_eq!(index, 3);
        drop(registry);
        assert_eq!(variable, expected);
    }

    #[test]
    fn switch() {
        let mut verbose = false;
        let mut registry = OptionRegistry::new().make(&mut verbose, "v");

        let index = registry.parse_tokens(&["program", "-v"]);

        assert_eq!(index, 2);
        drop(registry);
        assert!(verbose);
    }

    #[test]
    fn switch_not_given() {
        let mut verbose = false;
        let mut registry = OptionRegistry::new().make(&mut verbose, "v");

        let index = registry.parse_tokens(&["program", "operand"]);

        assert_eq!(index, 1);
        drop(registry);
        assert!(!verbose);
    }

    #[test]
    fn stops_at_operand() {
        let mut a: u32 = 0;
        let mut b: u32 = 0;
        let mut registry = OptionRegistry::new().make(&mut a, "a").make(&mut b, "b");
        let argv = vec!["program", "-a", "1", "positional", "-b", "2"];

        let index = registry.parse_tokens(&argv);

        assert_eq!(argv[index], "positional");
        drop(registry);
        assert_eq!(a, 1);
        assert_eq!(b, 0);
    }

    #[test]
    fn skips_unknown() {
        let mut a: u32 = 0;
        let mut registry = OptionRegistry::new().make(&mut a, "a");

        let index = registry.parse_tokens(&["program", "-unknown", "-a", "1"]);

        assert_eq!(index, 4);
        assert_eq!(registry.len(), 1);
        assert!(!registry.contains("unknown"));
        drop(registry);
        assert_eq!(a, 1);
    }

    #[test]
    fn trailing_flag() {
        let mut a: u32 = 9;
        let mut registry = OptionRegistry::new().make(&mut a, "a");

        let index = registry.parse_tokens(&["program", "-a"]);

        assert_eq!(index, 2);
        drop(registry);
        assert_eq!(a, 9);
    }

    #[test]
    fn negative_value() {
        let mut offset: i64 = 0;
        let mut registry = OptionRegistry::new().make(&mut offset, "offset");

        registry.parse_tokens(&["program", "-offset", "-5"]);

        drop(registry);
        assert_eq!(offset, -5);
    }

    #[test]
    fn last_write_wins() {
        let mut name = String::default();
        let mut registry = OptionRegistry::new().make(&mut name, "name");

        registry.parse_tokens(&["program", "-name", "first", "-name", "second"]);

        drop(registry);
        assert_eq!(name, "second");
    }

    #[test]
    fn reregister() {
        // Setup
        let mut first: u32 = 0;
        let mut second: u32 = 0;
        let mut registry = OptionRegistry::new()
            .make(&mut first, "n")
            .make(&mut second, "n");

        // Execute
        registry.parse_tokens(&["program", "-n", "3"]);

        // Verify
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.names(), vec!["n"]);
        drop(registry);
        assert_eq!(first, 0);
        assert_eq!(second, 3);
    }

    #[test]
    fn reregister_different_type() {
        let mut count: u32 = 0;
        let mut verbose = false;
        let mut registry = OptionRegistry::new()
            .make(&mut count, "v")
            .make(&mut verbose, "v");

        let index = registry.parse_tokens(&["program", "-v", "3"]);

        assert_eq!(index, 2);
        drop(registry);
        assert_eq!(count, 0);
        assert!(verbose);
    }

    #[test]
    fn table_reflects_live_values() {
        // Setup
        let mut test = "abc".to_string();
        let mut yesno = false;
        let mut param: f64 = 100.0;
        let mut log = OutputFile::default();
        let mut replacement: u8 = 0;
        let mut registry = OptionRegistry::new()
            .make(&mut test, "t")
            .make(&mut yesno, "y")
            .make(&mut param, "p")
            .make(&mut log, "l")
            .make(&mut replacement, "t");
        let mut before: Vec<u8> = Vec::default();
        let mut after: Vec<u8> = Vec::default();

        // Execute
        registry.write_table(&mut before).unwrap();
        registry.parse_tokens(&["program", "-t", "7", "-y", "-p", "0.5"]);
        registry.write_table(&mut after).unwrap();

        // Verify
        let before = String::from_utf8(before).unwrap();
        let after = String::from_utf8(after).unwrap();
        assert_eq!(before.lines().count(), 5);
        assert_eq!(after.lines().count(), 5);
        assert!(before.ends_with('\n'));
        assert_eq!(before.lines().next(), Some("option\tdefault\ttype"));
        assert_contains!(before, "p\t100\tf64\n");
        assert_contains!(before, "t\t0\tu8\n");
        assert_contains!(before, "y\tfalse\tbool\n");
        assert_contains!(before, "l\tfile\t");
        assert_contains!(after, "p\t0.5\tf64\n");
        assert_contains!(after, "t\t7\tu8\n");
        assert_contains!(after, "y\ttrue\tbool\n");
        assert_contains!(after, "l\tfile\t");
        assert_eq!(registry.to_string(), after);
        drop(registry);
        assert_eq!(test, "abc");
        assert_eq!(replacement, 7);
    }

    #[test]
    fn value() {
        let mut param: f64 = 1.5;
        let mut registry = OptionRegistry::new().make(&mut param, "p");
        assert_eq!(registry.value("p"), Some("1.5".to_string()));
        assert_eq!(registry.value("q"), None);

        registry.parse_tokens(&["program", "-p", "3"]);
        assert_eq!(registry.value("p"), Some("3".to_string()));
    }

    #[test]
    fn empty_registry() {
        let mut registry = OptionRegistry::default();
        assert!(registry.is_empty());
        assert_eq!(registry.to_string(), "option\tdefault\ttype\n");

        let argv: &[&str] = &[];
        assert_eq!(registry.parse_tokens(argv), 0);
        assert_eq!(registry.parse_tokens(&["program"]), 1);
    }

    #[test]
    fn file_sink() {
        let path = std::env::temp_dir().join("flagbind-core-file-sink.log");
        let mut log = OutputFile::default();
        let mut registry = OptionRegistry::new().make(&mut log, "l");

        registry.parse_tokens(&["program", "-l", path.to_str().unwrap()]);

        assert_eq!(registry.value("l"), Some("file".to_string()));
        drop(registry);
        writeln!(log, "contents").unwrap();
        log.close();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "contents\n");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn file_sink_failed() {
        let path = std::env::temp_dir()
            .join("flagbind-does-not-exist")
            .join("file.log");
        let mut log = OutputFile::default();
        let mut registry = OptionRegistry::new().make(&mut log, "l");

        let index = registry.parse_tokens(&["program", "-l", path.to_str().unwrap(), "rest"]);

        assert_eq!(index, 3);
        assert_eq!(registry.value("l"), Some("file".to_string()));
        drop(registry);
        assert!(!log.is_open());
        assert!(log.error().is_some());
    }

    #[test]
    fn try_parse_tokens_file_sink_failed() {
        let path = std::env::temp_dir()
            .join("flagbind-does-not-exist")
            .join("file.log");
        let mut log = OutputFile::default();
        let mut registry = OptionRegistry::new().make(&mut log, "l");

        let error = registry
            .try_parse_tokens(&["program", "-l", path.to_str().unwrap()])
            .unwrap_err();

        assert_matches!(
            error,
            ParseError::Capture {
                offset: 2,
                source: crate::CaptureError::OpenFailed { .. }
            }
        );
        assert_contains!(error.to_string(), "cannot open");
    }

    #[test]
    fn try_parse_tokens_partial() {
        let mut a: u32 = 0;
        let mut b: u32 = 0;
        let mut registry = OptionRegistry::new().make(&mut a, "a").make(&mut b, "b");

        let error = registry
            .try_parse_tokens(&["program", "-a", "1", "-c", "-b", "2"])
            .unwrap_err();

        assert_matches!(error, ParseError::UnknownFlag { offset: 3, .. });
        drop(registry);
        assert_eq!(a, 1);
        assert_eq!(b, 0);
    }

    #[derive(Debug, PartialEq)]
    struct Ratio(u32, u32);

    impl FromStr for Ratio {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.split_once(':') {
                Some((left, right)) => Ok(Ratio(
                    left.parse().map_err(|_| s.to_string())?,
                    right.parse().map_err(|_| s.to_string())?,
                )),
                None => Err(s.to_string()),
            }
        }
    }

    impl std::fmt::Display for Ratio {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}:{}", self.0, self.1)
        }
    }

    #[rstest]
    #[case(vec!["program", "-ratio", "16:9"], Ratio(16, 9))]
    #[case(vec!["program", "-ratio", "16/9"], Ratio(4, 3))]
    #[case(vec!["program", "-ratio"], Ratio(4, 3))]
    fn custom_scalar(#[case] argv: Vec<&str>, #[case] expected: Ratio) {
        let mut ratio = Ratio(4, 3);
        let mut registry = OptionRegistry::new().add("ratio", Scalar::new(&mut ratio));
        assert_contains!(registry.to_string(), "ratio\t4:3\t");

        registry.parse_tokens(&argv);

        drop(registry);
        assert_eq!(ratio, expected);
    }
}
