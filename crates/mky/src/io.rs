//! Host I/O seams: program output, interactive input, and source loading.
//!
//! The evaluator only ever talks to these traits, so hosts can capture
//! output, script input, or serve sources from memory. The default
//! implementations go to the real stdout/stdin/filesystem.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead as _, Write as _};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use ahash::AHashMap;

/// Sink for everything the program writes (`write`, `writeLine`, echoed
/// print statements, prompts).
pub trait OutputWriter {
    /// Writes `text` with no added separator or terminator.
    fn write_str(&mut self, text: &str);

    /// Writes `text` followed by a newline.
    fn write_line(&mut self, text: &str) {
        self.write_str(text);
        self.write_str("\n");
    }
}

/// Writes straight to stdout, flushing per call so prompts appear before
/// blocking reads.
#[derive(Debug, Default)]
pub struct StdOutput;

impl OutputWriter for StdOutput {
    fn write_str(&mut self, text: &str) {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }
}

/// Collects all output into a shared buffer.
///
/// The buffer handle can be cloned out before the writer is handed to an
/// interpreter, so tests read what ran afterwards.
#[derive(Debug, Default)]
pub struct CollectStringOutput(Rc<RefCell<String>>);

impl CollectStringOutput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle onto the collected output.
    #[must_use]
    pub fn buffer(&self) -> Rc<RefCell<String>> {
        Rc::clone(&self.0)
    }
}

impl OutputWriter for CollectStringOutput {
    fn write_str(&mut self, text: &str) {
        self.0.borrow_mut().push_str(text);
    }
}

/// Discards all output.
#[derive(Debug, Default)]
pub struct NullOutput;

impl OutputWriter for NullOutput {
    fn write_str(&mut self, _text: &str) {}
}

/// Source of interactive input for `take`/`takeLine`.
pub trait InputReader {
    /// Reads one line, without its trailing newline. End of input reads
    /// as an empty string.
    fn read_line(&mut self) -> String;
}

/// Reads lines from stdin.
#[derive(Debug, Default)]
pub struct StdInput;

impl InputReader for StdInput {
    fn read_line(&mut self) -> String {
        let mut line = String::new();
        let _ = io::stdin().lock().read_line(&mut line);
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        line
    }
}

/// Serves a fixed queue of lines; used by tests.
#[derive(Debug, Default)]
pub struct QueueInput {
    lines: VecDeque<String>,
}

impl QueueInput {
    #[must_use]
    pub fn new(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl InputReader for QueueInput {
    fn read_line(&mut self) -> String {
        self.lines.pop_front().unwrap_or_default()
    }
}

/// Always reads an empty line.
#[derive(Debug, Default)]
pub struct EmptyInput;

impl InputReader for EmptyInput {
    fn read_line(&mut self) -> String {
        String::new()
    }
}

/// The "read source by path" callback the linker consumes.
pub trait SourceLoader {
    fn load(&mut self, path: &Path) -> io::Result<String>;
}

/// Loads sources from the real filesystem.
#[derive(Debug, Default)]
pub struct FsLoader;

impl SourceLoader for FsLoader {
    fn load(&mut self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Serves sources from an in-memory map; used by linker tests.
#[derive(Debug, Default)]
pub struct MapLoader {
    files: AHashMap<PathBuf, String>,
}

impl MapLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, source: impl Into<String>) {
        self.files.insert(path.into(), source.into());
    }
}

impl SourceLoader for MapLoader {
    fn load(&mut self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no such file: {}", path.display())))
    }
}
