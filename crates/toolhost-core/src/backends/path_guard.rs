//! Confines caller-supplied relative paths to a root directory

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use super::error::{BackendError, BackendResult};

/// Resolves relative paths under a canonical root
///
/// Rejects absolute paths and `..` traversal lexically, then walks the
/// existing components and follows every symlink, dangling ones included,
/// so a link cannot lead out of the root either.
#[derive(Debug, Clone)]
pub struct PathGuard {
    root: PathBuf,
}

impl PathGuard {
    /// Create the root if needed and canonicalize it
    pub fn new(root: impl AsRef<Path>) -> BackendResult<Self> {
        let root = root.as_ref();
        std::fs::create_dir_all(root)?;
        Ok(Self {
            root: root.canonicalize()?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `relative` to a path under the root
    pub fn resolve(&self, relative: &str) -> BackendResult<PathBuf> {
        let escape = || BackendError::PathEscape(relative.to_string());

        let mut normalized = PathBuf::new();
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(part) => normalized.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    if !normalized.pop() {
                        return Err(escape());
                    }
                }
                Component::RootDir | Component::Prefix(_) => return Err(escape()),
            }
        }

        let candidate = self.root.join(&normalized);

        let mut current = self.root.clone();
        for part in normalized.components() {
            current.push(part);
            match std::fs::symlink_metadata(&current) {
                Ok(meta) if meta.file_type().is_symlink() => {
                    let target = self.link_target(&current)?;
                    if !target.starts_with(&self.root) {
                        return Err(escape());
                    }
                    current = target;
                }
                Ok(_) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => break,
                Err(e) => return Err(e.into()),
            }
        }

        Ok(candidate)
    }

    /// Where `link` points, resolved even when the target does not exist yet
    fn link_target(&self, link: &Path) -> BackendResult<PathBuf> {
        match link.canonicalize() {
            Ok(real) => return Ok(real),
            Err(e) if e.kind() != ErrorKind::NotFound => return Err(e.into()),
            Err(_) => {}
        }

        let parent = link.parent().unwrap_or(self.root.as_path());
        let target = lexical_normalize(&parent.join(std::fs::read_link(link)?));

        // Dangling: canonicalize the deepest ancestor that exists and re-append the rest
        let existing = target
            .ancestors()
            .find(|p| std::fs::symlink_metadata(p).is_ok())
            .unwrap_or(self.root.as_path());
        if std::fs::symlink_metadata(existing)?.file_type().is_symlink() {
            // Chain ending in another dangling link
            return Err(BackendError::PathEscape(self.relative(link)));
        }
        let rest = target.strip_prefix(existing).unwrap_or(Path::new(""));
        Ok(existing.canonicalize()?.join(rest))
    }

    /// Display form of `path` relative to the root
    pub fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned()
    }
}

fn lexical_normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                normalized.pop();
            }
            Component::CurDir => {}
            other => normalized.push(other),
        }
    }
    normalized
}
