//! Internal helpers.

use std::path::{Component, Path, PathBuf};

/// Lexically normalizes a path: drops `.` components, folds `name/..`, and
/// maps an empty result to `.`. The filesystem is not consulted.
pub(crate) fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last = out.components().next_back();
                let (folds, rooted) = match last {
                    Some(Component::Normal(_)) => (true, false),
                    Some(Component::RootDir | Component::Prefix(_)) => (false, true),
                    _ => (false, false),
                };
                if folds {
                    out.pop();
                } else if !rooted {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}
