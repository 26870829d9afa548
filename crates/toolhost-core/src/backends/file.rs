//! File system backend: read, write, list and delete under a confined root

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::logging::Logger;
use crate::types::{ToolName, ToolRequest};

use super::error::{BackendError, BackendResult};
use super::path_guard::PathGuard;
use super::traits::{Backend, ToolOutput};

const FILE_TOOLS: &[ToolName] = &[
    ToolName::ReadFile,
    ToolName::WriteFile,
    ToolName::ListFiles,
    ToolName::DeleteFile,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub name: String,
    /// Path relative to the backend root
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Size in bytes, files only
    pub size: Option<u64>,
}

pub struct FileBackend {
    guard: PathGuard,
    logger: Arc<dyn Logger>,
}

impl FileBackend {
    /// Create a backend rooted at `root`, creating the directory if needed
    pub fn new(root: impl AsRef<Path>, logger: Arc<dyn Logger>) -> BackendResult<Self> {
        let guard = PathGuard::new(root)?;
        crate::log_debug!(logger, "[FileBackend] Root: {}", guard.root().display());
        Ok(Self { guard, logger })
    }

    pub fn root(&self) -> &Path {
        self.guard.root()
    }

    pub async fn read_file(&self, path: &str) -> BackendResult<String> {
        let full_path = self.guard.resolve(path)?;
        if !tokio::fs::try_exists(&full_path).await? {
            return Err(BackendError::FileNotFound(path.to_string()));
        }

        let content = tokio::fs::read_to_string(&full_path).await?;
        crate::log_info!(self.logger, "[FileBackend] Read file: {}", path);
        Ok(content)
    }

    /// Write `content`, creating parent directories
    pub async fn write_file(&self, path: &str, content: &str) -> BackendResult<()> {
        let full_path = self.guard.resolve(path)?;
        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&full_path, content).await?;
        crate::log_info!(self.logger, "[FileBackend] Wrote file: {}", path);
        Ok(())
    }

    /// Entries of `directory`, sorted by name
    pub async fn list_files(&self, directory: &str) -> BackendResult<Vec<FileEntry>> {
        let full_path = self.guard.resolve(directory)?;
        if !tokio::fs::try_exists(&full_path).await? {
            return Err(BackendError::DirectoryNotFound(directory.to_string()));
        }
        if !tokio::fs::metadata(&full_path).await?.is_dir() {
            return Err(BackendError::NotADirectory(directory.to_string()));
        }

        let mut entries = Vec::new();
        let mut reader = tokio::fs::read_dir(&full_path).await?;
        while let Some(item) = reader.next_entry().await? {
            let metadata = tokio::fs::metadata(item.path()).await?;
            let is_dir = metadata.is_dir();
            entries.push(FileEntry {
                name: item.file_name().to_string_lossy().into_owned(),
                path: self.guard.relative(&item.path()),
                kind: if is_dir { EntryKind::Directory } else { EntryKind::File },
                size: (!is_dir).then(|| metadata.len()),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        crate::log_info!(self.logger, "[FileBackend] Listed files in: {}", directory);
        Ok(entries)
    }

    pub async fn delete_file(&self, path: &str) -> BackendResult<()> {
        let full_path = self.guard.resolve(path)?;
        if !tokio::fs::try_exists(&full_path).await? {
            return Err(BackendError::FileNotFound(path.to_string()));
        }

        tokio::fs::remove_file(&full_path).await?;
        crate::log_info!(self.logger, "[FileBackend] Deleted file: {}", path);
        Ok(())
    }
}

#[async_trait]
impl Backend for FileBackend {
    fn name(&self) -> &str {
        "file"
    }

    fn capabilities(&self) -> &'static [ToolName] {
        FILE_TOOLS
    }

    async fn call(&self, request: ToolRequest) -> BackendResult<ToolOutput> {
        match request {
            ToolRequest::ReadFile(args) => self.read_file(&args.path).await.map(ToolOutput::Text),
            ToolRequest::WriteFile(args) => {
                self.write_file(&args.path, &args.content).await?;
                Ok(ToolOutput::Text(format!("File written successfully: {}", args.path)))
            }
            ToolRequest::ListFiles(args) => {
                let entries = self.list_files(&args.directory).await?;
                Ok(ToolOutput::Json(serde_json::to_value(entries)?))
            }
            ToolRequest::DeleteFile(args) => {
                self.delete_file(&args.path).await?;
                Ok(ToolOutput::Text(format!("Successfully deleted {}", args.path)))
            }
            other => Err(BackendError::unsupported(self.name(), other.tool())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::types::{DeleteFileArgs, ListFilesArgs, ReadFileArgs, WriteFileArgs};
    use tempfile::{tempdir, TempDir};

    fn backend() -> (TempDir, FileBackend) {
        let dir = tempdir().unwrap();
        let backend = FileBackend::new(dir.path(), Arc::new(NoOpLogger::new())).unwrap();
        (dir, backend)
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let (_dir, backend) = backend();

        let written = backend
            .call(ToolRequest::WriteFile(WriteFileArgs {
                path: "notes/hello.txt".into(),
                content: "Hello, world!".into(),
            }))
            .await
            .unwrap();
        assert_eq!(written.render(), "File written successfully: notes/hello.txt");

        let read = backend
            .call(ToolRequest::ReadFile(ReadFileArgs {
                path: "notes/hello.txt".into(),
            }))
            .await
            .unwrap();
        assert_eq!(read, ToolOutput::Text("Hello, world!".into()));
    }

    #[tokio::test]
    async fn test_escape_attempts_fail() {
        let (_dir, backend) = backend();

        for path in ["../../etc/passwd", "/etc/passwd"] {
            let err = backend.read_file(path).await.unwrap_err();
            assert!(matches!(err, BackendError::PathEscape(_)), "{} -> {:?}", path, err);
        }

        let err = backend.write_file("../outside.txt", "x").await.unwrap_err();
        assert!(matches!(err, BackendError::PathEscape(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_write_through_dangling_link_fails() {
        let (dir, backend) = backend();
        let outside = tempdir().unwrap();
        let planted = outside.path().join("planted.txt");
        std::os::unix::fs::symlink(&planted, dir.path().join("link")).unwrap();

        let err = backend.write_file("link", "escaped").await.unwrap_err();
        assert!(matches!(err, BackendError::PathEscape(_)));
        assert!(!planted.exists());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let (_dir, backend) = backend();

        let err = backend.read_file("absent.txt").await.unwrap_err();
        assert!(matches!(err, BackendError::FileNotFound(_)));
        assert_eq!(err.to_string(), "File not found: absent.txt");

        let err = backend.delete_file("absent.txt").await.unwrap_err();
        assert!(matches!(err, BackendError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_list_sorted_with_types() {
        let (dir, backend) = backend();
        std::fs::write(dir.path().join("b.txt"), "12345").unwrap();
        std::fs::write(dir.path().join("a.txt"), "1").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let entries = backend.list_files(".").await.unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "sub"]);
        assert_eq!(entries[1].size, Some(5));
        assert_eq!(entries[2].kind, EntryKind::Directory);
        assert_eq!(entries[2].size, None);
        assert_eq!(entries[2].path, "sub");

        let output = backend
            .call(ToolRequest::ListFiles(ListFilesArgs { directory: ".".into() }))
            .await
            .unwrap();
        let ToolOutput::Json(value) = output else {
            panic!("expected JSON listing");
        };
        assert_eq!(value[0]["type"], "file");
        assert_eq!(value[2]["type"], "directory");
    }

    #[tokio::test]
    async fn test_list_errors() {
        let (dir, backend) = backend();
        std::fs::write(dir.path().join("file.txt"), "x").unwrap();

        assert!(matches!(
            backend.list_files("missing").await,
            Err(BackendError::DirectoryNotFound(_))
        ));
        assert!(matches!(
            backend.list_files("file.txt").await,
            Err(BackendError::NotADirectory(_))
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let (dir, backend) = backend();
        std::fs::write(dir.path().join("gone.txt"), "x").unwrap();

        let output = backend
            .call(ToolRequest::DeleteFile(DeleteFileArgs { path: "gone.txt".into() }))
            .await
            .unwrap();
        assert_eq!(output.render(), "Successfully deleted gone.txt");
        assert!(!dir.path().join("gone.txt").exists());
    }

    #[tokio::test]
    async fn test_foreign_request_is_unsupported() {
        let (_dir, backend) = backend();
        let err = backend.call(ToolRequest::ListModels).await.unwrap_err();
        assert!(matches!(err, BackendError::Unsupported { .. }));
    }
}
