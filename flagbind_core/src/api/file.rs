use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// A caller-owned output file that a [`FileSink`](crate::FileSink) opens when its flag is parsed.
///
/// Starts out closed.
/// Writing to a file that is not open fails with an [`io::Error`] rather than panicking.
///
/// ### Example
/// ```
/// # use flagbind_core as flagbind;
/// use flagbind::{OptionRegistry, OutputFile};
/// use std::io::Write;
///
/// let path = std::env::temp_dir().join("flagbind-output-file-doc.log");
/// let mut log = OutputFile::default();
/// let mut registry = OptionRegistry::new().make(&mut log, "l");
/// registry.parse_tokens(&["program", "-l", path.to_str().unwrap()]);
/// drop(registry);
///
/// assert!(log.is_open());
/// writeln!(log, "hello").unwrap();
/// # std::fs::remove_file(path).unwrap();
/// ```
#[derive(Debug, Default)]
pub struct OutputFile {
    state: FileState,
}

#[derive(Debug, Default)]
enum FileState {
    #[default]
    Closed,
    Open(File),
    Failed(io::Error),
}

impl OutputFile {
    /// Open the path for writing, creating or truncating it.
    ///
    /// Any previously open file is closed first.
    /// On failure the file is left in the failed state, and the error is reported through [`OutputFile::error`] as well as returned.
    pub fn open(&mut self, path: impl AsRef<Path>) -> io::Result<()> {
        match File::create(path) {
            Ok(file) => {
                self.state = FileState::Open(file);
                Ok(())
            }
            Err(error) => {
                // Keep a copy for the caller to inspect later.
                let kept = io::Error::new(error.kind(), error.to_string());
                self.state = FileState::Failed(kept);
                Err(error)
            }
        }
    }

    /// Whether a file is currently open.
    pub fn is_open(&self) -> bool {
        matches!(self.state, FileState::Open(_))
    }

    /// The error from the most recent failed [`OutputFile::open`], if that is the current state.
    pub fn error(&self) -> Option<&io::Error> {
        match &self.state {
            FileState::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// Close the file (if any), returning to the closed state.
    pub fn close(&mut self) {
        self.state = FileState::Closed;
    }

    fn file(&mut self) -> io::Result<&mut File> {
        match &mut self.state {
            FileState::Open(file) => Ok(file),
            FileState::Closed => Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "output file is not open",
            )),
            FileState::Failed(error) => Err(io::Error::new(
                error.kind(),
                format!("output file failed to open: {error}"),
            )),
        }
    }
}

impl Write for OutputFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.state {
            FileState::Open(file) => file.flush(),
            // Nothing buffered.
            _ => Ok(()),
        }
    }
}
