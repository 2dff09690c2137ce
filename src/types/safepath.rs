use std::path::{Component, Path, PathBuf};

use super::errors::{Error, ErrorKind, Result};

/// A workspace-relative path proven to stay under its root.
///
/// Every mutating code path in the crate takes a `SafePath`; construction is
/// the single place where `..` traversal and root escapes are rejected, which
/// happens before any I/O.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SafePath {
    root: PathBuf,
    rel: PathBuf,
}

impl SafePath {
    /// Validate `candidate` against `root`. Absolute candidates must already
    /// live under the root; relative ones may not contain `..`.
    pub fn from_rooted(root: &Path, candidate: &Path) -> Result<Self> {
        if !root.is_absolute() {
            return Err(Error::new(ErrorKind::InvalidPath, "workspace root must be absolute"));
        }
        let effective = if candidate.is_absolute() {
            candidate
                .strip_prefix(root)
                .map_err(|_| escape_err(candidate))?
                .to_path_buf()
        } else {
            candidate.to_path_buf()
        };

        let mut rel = PathBuf::new();
        for seg in effective.components() {
            match seg {
                Component::CurDir => {}
                Component::Normal(p) => rel.push(p),
                Component::ParentDir => return Err(escape_err(candidate)),
                _ => {
                    return Err(Error::new(
                        ErrorKind::InvalidPath,
                        format!("unsupported path component in {}", candidate.display()),
                    ))
                }
            }
        }
        if !root.join(&rel).starts_with(root) {
            return Err(escape_err(candidate));
        }
        Ok(SafePath {
            root: root.to_path_buf(),
            rel,
        })
    }

    /// Full path: root joined with the relative component.
    pub fn as_path(&self) -> PathBuf {
        self.root.join(&self.rel)
    }

    pub fn rel(&self) -> &Path {
        &self.rel
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn escape_err(candidate: &Path) -> Error {
    Error::new(
        ErrorKind::PathEscape,
        format!("path escapes workspace root: {}", candidate.display()),
    )
}
