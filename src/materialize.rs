//! On-disk materialization of generated files
//!
//! Writes a project's generated files under a per-project directory derived
//! from the project id. Path safety is enforced in two layers:
//!
//! 1. textual rejection of parent-directory segments and absolute paths, and
//! 2. resolved-prefix containment of each target's deepest existing ancestor
//!    against the canonicalized project root.
//!
//! Neither layer alone is sufficient: textual checks miss symlink escapes,
//! and prefix checks on unresolved paths miss `..` and absolute paths. The
//! whole batch is validated before any directory or file is created, so a
//! single invalid path aborts the operation with nothing materialized and
//! no directories made outside the root.

use crate::model::GeneratedFile;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{info, warn};
use uuid::Uuid;

/// Errors raised while writing generated files to disk
///
/// Path-safety violations are kept distinct from plain I/O failures so the
/// lifecycle can report them as generation-fatal rather than transient.
#[derive(Debug, Error)]
pub enum MaterializeError {
    /// The raw path contains a parent-directory segment
    #[error("Path traversal detected in generated file path: {path}")]
    PathTraversal { path: String },

    /// The resolved path does not stay inside the project root
    #[error("Generated file path escapes the project root: {path}")]
    EscapesRoot { path: String },

    /// Filesystem failure
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Writes generated file batches into per-project directories
#[derive(Debug, Clone)]
pub struct ProjectMaterializer {
    storage_root: PathBuf,
}

impl ProjectMaterializer {
    pub fn new(storage_root: impl Into<PathBuf>) -> Self {
        Self {
            storage_root: storage_root.into(),
        }
    }

    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }

    /// Directory a project's files materialize into
    pub fn project_dir(&self, project_id: Uuid) -> PathBuf {
        self.storage_root.join(project_id.to_string())
    }

    /// Validate and write the whole batch, returning the project directory
    ///
    /// Existing files at the same paths are overwritten; regeneration is
    /// expected to replace prior output.
    pub async fn write(
        &self,
        project_id: Uuid,
        files: &[GeneratedFile],
    ) -> Result<PathBuf, MaterializeError> {
        // Layer 1: textual validation of the entire batch up front
        for file in files {
            validate_relative(&file.path)?;
        }

        let root = self.project_dir(project_id);
        fs::create_dir_all(&root).await?;
        let root_resolved = fs::canonicalize(&root).await?;

        // Layer 2: verify resolved containment for every target before
        // creating directories or writing content. The deepest existing
        // ancestor is canonicalized so a pre-planted symlink cannot route
        // directory creation outside the root.
        let mut targets = Vec::with_capacity(files.len());
        for file in files {
            let target = root.join(&file.path);
            let parent = target.parent().map(Path::to_path_buf).unwrap_or_else(|| root.clone());

            let anchor = deepest_existing(&parent);
            let anchor_resolved = fs::canonicalize(anchor).await?;
            if !anchor_resolved.starts_with(&root_resolved) {
                warn!(
                    project_id = %project_id,
                    path = %file.path,
                    "Rejected generated file escaping project root"
                );
                return Err(MaterializeError::EscapesRoot {
                    path: file.path.clone(),
                });
            }
            targets.push((target, parent));
        }

        for (file, (target, parent)) in files.iter().zip(&targets) {
            fs::create_dir_all(parent).await?;
            fs::write(target, &file.content).await?;
        }

        info!(
            project_id = %project_id,
            file_count = files.len(),
            dir = %root.display(),
            "Materialized project files"
        );

        Ok(root)
    }

    /// Remove a project's materialized directory, if present
    pub async fn remove(&self, project_id: Uuid) -> Result<(), MaterializeError> {
        let root = self.project_dir(project_id);
        match fs::remove_dir_all(&root).await {
            Ok(()) => {
                info!(project_id = %project_id, "Removed materialized project directory");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Walk up to the closest path component that exists on disk
///
/// Symlinks count as existing even when dangling, so a planted link is
/// always the thing that gets canonicalized rather than skipped over.
fn deepest_existing(path: &Path) -> &Path {
    let mut current = path;
    while current.symlink_metadata().is_err() {
        match current.parent() {
            Some(parent) => current = parent,
            None => break,
        }
    }
    current
}

fn validate_relative(path: &str) -> Result<(), MaterializeError> {
    if path.is_empty() || path.contains("..") {
        return Err(MaterializeError::PathTraversal {
            path: path.to_string(),
        });
    }

    for component in Path::new(path).components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => {
                return Err(MaterializeError::PathTraversal {
                    path: path.to_string(),
                })
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(MaterializeError::EscapesRoot {
                    path: path.to_string(),
                })
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn file(path: &str) -> GeneratedFile {
        GeneratedFile::new(path, "content", "text", "test fixture")
    }

    #[tokio::test]
    async fn test_writes_nested_files() {
        let dir = TempDir::new().unwrap();
        let materializer = ProjectMaterializer::new(dir.path());
        let project_id = Uuid::new_v4();

        let files = vec![file("package.json"), file("src/components/Header.tsx")];
        let root = materializer.write(project_id, &files).await.unwrap();

        assert!(root.join("package.json").is_file());
        assert!(root.join("src/components/Header.tsx").is_file());
        assert_eq!(
            std::fs::read_to_string(root.join("package.json")).unwrap(),
            "content"
        );
    }

    #[tokio::test]
    async fn test_rejects_parent_segments_without_writing() {
        let dir = TempDir::new().unwrap();
        let materializer = ProjectMaterializer::new(dir.path());
        let project_id = Uuid::new_v4();

        let files = vec![file("ok.txt"), file("../../etc/passwd")];
        let err = materializer.write(project_id, &files).await.unwrap_err();

        assert!(matches!(err, MaterializeError::PathTraversal { .. }));
        // Fail-fast: the valid file from the same batch must not exist either
        assert!(!materializer.project_dir(project_id).join("ok.txt").exists());
    }

    #[tokio::test]
    async fn test_rejects_absolute_path() {
        let dir = TempDir::new().unwrap();
        let materializer = ProjectMaterializer::new(dir.path());

        let err = materializer
            .write(Uuid::new_v4(), &[file("/etc/hostname")])
            .await
            .unwrap_err();
        assert!(matches!(err, MaterializeError::EscapesRoot { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_rejects_symlink_escape() {
        let storage = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        let materializer = ProjectMaterializer::new(storage.path());
        let project_id = Uuid::new_v4();

        // Plant a symlink inside the project root pointing outside it
        let root = materializer.project_dir(project_id);
        std::fs::create_dir_all(&root).unwrap();
        std::os::unix::fs::symlink(outside.path(), root.join("leak")).unwrap();

        let err = materializer
            .write(project_id, &[file("leak/stolen.txt")])
            .await
            .unwrap_err();
        assert!(matches!(err, MaterializeError::EscapesRoot { .. }));
        assert!(!outside.path().join("stolen.txt").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_escape_makes_no_outside_directories() {
        let storage = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        let materializer = ProjectMaterializer::new(storage.path());
        let project_id = Uuid::new_v4();

        let root = materializer.project_dir(project_id);
        std::fs::create_dir_all(&root).unwrap();
        std::os::unix::fs::symlink(outside.path(), root.join("leak")).unwrap();

        // A nested path routed through the symlink must be rejected before
        // any of its intermediate directories are created
        let err = materializer
            .write(project_id, &[file("leak/a/b.txt")])
            .await
            .unwrap_err();
        assert!(matches!(err, MaterializeError::EscapesRoot { .. }));
        assert!(!outside.path().join("a").exists());
    }

    #[tokio::test]
    async fn test_overwrites_existing_files() {
        let dir = TempDir::new().unwrap();
        let materializer = ProjectMaterializer::new(dir.path());
        let project_id = Uuid::new_v4();

        materializer.write(project_id, &[file("a.txt")]).await.unwrap();
        let updated = GeneratedFile::new("a.txt", "updated", "text", "test fixture");
        let root = materializer.write(project_id, &[updated]).await.unwrap();

        assert_eq!(std::fs::read_to_string(root.join("a.txt")).unwrap(), "updated");
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let materializer = ProjectMaterializer::new(dir.path());
        let project_id = Uuid::new_v4();

        materializer.write(project_id, &[file("a.txt")]).await.unwrap();
        materializer.remove(project_id).await.unwrap();
        assert!(!materializer.project_dir(project_id).exists());

        // Second remove is a no-op
        materializer.remove(project_id).await.unwrap();
    }
}
