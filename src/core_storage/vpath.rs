//! Session-scoped virtual paths.
//!
//! A session sees a logical tree rooted at `/`. Arguments are resolved
//! against the working directory lexically and can never climb above `/`,
//! so joining the result onto the sandbox root always stays inside it.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Resolves `arg` against `cwd`, collapsing `.`, `..` and repeated `/`.
/// An absolute `arg` replaces `cwd`.
pub fn resolve(cwd: &str, arg: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    let base = if arg.starts_with('/') { "" } else { cwd };
    for segment in base.split('/').chain(arg.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            name => parts.push(name),
        }
    }
    format!("/{}", parts.join("/"))
}

/// Maps a resolved virtual path onto the backend path below `sandbox_root`.
pub fn to_backend(sandbox_root: &Path, virtual_path: &str) -> PathBuf {
    let relative = virtual_path.trim_start_matches('/');
    if relative.is_empty() {
        sandbox_root.to_path_buf()
    } else {
        sandbox_root.join(relative)
    }
}

/// Strips `..` and runs of `/` from a name-list argument before it is used
/// to build a pattern.
pub fn collapse_pattern(arg: &str) -> String {
    static TRAVERSAL: OnceLock<Regex> = OnceLock::new();
    let re = TRAVERSAL.get_or_init(|| Regex::new(r"/{2,}|\.{2}").expect("static regex"));
    re.replace_all(arg, "").into_owned()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingDir {
    dir: String,
}

impl Default for WorkingDir {
    fn default() -> Self {
        Self {
            dir: String::from("/"),
        }
    }
}

impl WorkingDir {
    pub fn cwd(&self) -> &str {
        &self.dir
    }

    /// Changes directory and returns the new working directory.
    pub fn chdir(&mut self, arg: &str) -> &str {
        self.dir = resolve(&self.dir, arg);
        &self.dir
    }

    pub fn resolve(&self, arg: &str) -> String {
        resolve(&self.dir, arg)
    }
}
