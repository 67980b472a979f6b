//! Path utilities.
//!
//! Everything here except [`config_dir`] is lexical and never touches the
//! file system, so it is safe to call from code that promises no I/O.

use std::path::{Component, Path, PathBuf};

/// Get the mapnote configuration directory.
///
/// This follows XDG conventions on Linux/macOS:
/// - `$XDG_CONFIG_HOME/mapnote` if set
/// - `~/.config/mapnote` otherwise
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("mapnote"))
}

/// Normalize a path by removing `.` components and folding `..` into the
/// directory before it.
///
/// Unlike `canonicalize`, this doesn't require the path to exist. A `..` with
/// nothing left to fold into is kept on a relative path (`../a` stays
/// `../a`) and dropped at the root (`/../a` is `/a`).
pub fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::ParentDir => match result.components().next_back() {
                Some(Component::Normal(_)) => {
                    result.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => result.push(Component::ParentDir),
            },
            Component::CurDir => {}
            _ => {
                result.push(component);
            }
        }
    }

    result
}

/// Resolve `relative` against `base` and normalize the result.
///
/// An absolute `relative` replaces `base`, following [`Path::join`].
pub fn resolve(base: &Path, relative: impl AsRef<Path>) -> PathBuf {
    normalize(&base.join(relative))
}

/// Check lexically whether `path` stays inside `base` once normalized.
///
/// Both paths should be relative or both absolute; a relative path is never
/// within an absolute base, and the reverse.
pub fn is_within(path: &Path, base: &Path) -> bool {
    let path = normalize(path);
    match path.strip_prefix(normalize(base)) {
        Ok(rest) => rest.components().all(|c| matches!(c, Component::Normal(_))),
        Err(_) => false,
    }
}
