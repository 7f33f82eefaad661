//! Path resolution and cycle tracking for `include`/`import`.
//!
//! The linker keeps a stack of files currently being processed; resolving
//! into a file already on the stack is a circular dependency and links as
//! an empty program, which makes mutually-including files safe. Actual
//! parsing and evaluation of linked files happens in the evaluator, which
//! owns a `Linker`.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use crate::io::SourceLoader;

/// File extension for source files.
pub const SOURCE_EXT: &str = "mky";

pub struct Linker {
    /// Installation root, used to find `lib/<name>/<name>.mky`.
    root: PathBuf,
    /// Directory of the file currently being processed; relative includes
    /// resolve against it.
    current_dir: PathBuf,
    /// Files currently being linked, outermost first.
    stack: Vec<PathBuf>,
    loader: Box<dyn SourceLoader>,
}

impl std::fmt::Debug for Linker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Linker")
            .field("root", &self.root)
            .field("current_dir", &self.current_dir)
            .field("stack", &self.stack)
            .finish_non_exhaustive()
    }
}

impl Linker {
    /// Builds a linker rooted at `MKYROOT`, falling back to the current
    /// working directory with a diagnostic when the variable is unset.
    #[must_use]
    pub fn new(loader: Box<dyn SourceLoader>) -> Self {
        let root = match env::var("MKYROOT") {
            Ok(root) if !root.is_empty() => PathBuf::from(root),
            _ => {
                eprintln!("MKYROOT is not set; using the current directory as the installation root");
                env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
            }
        };
        Self::with_root(root, loader)
    }

    #[must_use]
    pub fn with_root(root: impl Into<PathBuf>, loader: Box<dyn SourceLoader>) -> Self {
        let current_dir = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            root: root.into(),
            current_dir,
            stack: Vec::new(),
            loader,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    pub fn set_current_dir(&mut self, dir: impl Into<PathBuf>) {
        self.current_dir = dir.into();
    }

    pub fn set_root(&mut self, root: impl Into<PathBuf>) {
        self.root = root.into();
    }

    /// Resolves an include spec to a path: a name ending in the source
    /// extension is relative to the current file's directory, a bare name
    /// is a library lookup under the installation root.
    #[must_use]
    pub fn resolve(&self, spec: &str) -> PathBuf {
        if Path::new(spec).extension().is_some_and(|ext| ext == SOURCE_EXT) {
            self.current_dir.join(spec)
        } else {
            self.root.join("lib").join(spec).join(format!("{spec}.{SOURCE_EXT}"))
        }
    }

    /// Whether `path` is already being linked somewhere up the stack.
    #[must_use]
    pub fn is_linking(&self, path: &Path) -> bool {
        self.stack.iter().any(|entry| entry == path)
    }

    pub fn load(&mut self, path: &Path) -> io::Result<String> {
        self.loader.load(path)
    }

    /// Pushes `path` onto the processing stack and points the current
    /// directory at its parent. Returns the directory to restore.
    pub fn begin(&mut self, path: PathBuf) -> PathBuf {
        let parent = path.parent().filter(|parent| !parent.as_os_str().is_empty());
        let old = match parent {
            Some(parent) => std::mem::replace(&mut self.current_dir, parent.to_path_buf()),
            None => self.current_dir.clone(),
        };
        self.stack.push(path);
        old
    }

    /// Pops the current file and restores the saved directory.
    pub fn finish(&mut self, old_dir: PathBuf) {
        self.stack.pop();
        self.current_dir = old_dir;
    }
}
