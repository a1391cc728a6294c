//! Project archive export
//!
//! Packages a project's generated files into a downloadable archive named
//! `<project_id>.<ext>` under the storage root. Entries are written from the
//! in-memory file list, so the archive reflects exactly what was generated
//! regardless of what happened in the materialized directory since.

use crate::error::PlatformError;
use crate::model::GeneratedFile;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    TarGz,
}

impl ArchiveFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ArchiveFormat::Zip => "zip",
            ArchiveFormat::TarGz => "tar.gz",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "zip" => Some(ArchiveFormat::Zip),
            "tar.gz" | "tgz" | "tar" => Some(ArchiveFormat::TarGz),
            _ => None,
        }
    }
}

pub struct ArchiveExporter {
    storage_root: PathBuf,
}

impl ArchiveExporter {
    pub fn new(storage_root: impl Into<PathBuf>) -> Self {
        Self {
            storage_root: storage_root.into(),
        }
    }

    pub fn archive_path(&self, project_id: Uuid, format: ArchiveFormat) -> PathBuf {
        self.storage_root
            .join(format!("{}.{}", project_id, format.extension()))
    }

    /// Write all generated files into an archive, returning its path
    pub fn export(
        &self,
        project_id: Uuid,
        files: &[GeneratedFile],
        format: ArchiveFormat,
    ) -> Result<PathBuf, PlatformError> {
        std::fs::create_dir_all(&self.storage_root)?;
        let path = self.archive_path(project_id, format);

        match format {
            ArchiveFormat::Zip => write_zip(&path, files)?,
            ArchiveFormat::TarGz => write_tar_gz(&path, files)?,
        }

        info!(
            project_id = %project_id,
            path = %path.display(),
            entries = files.len(),
            "Archive exported"
        );

        Ok(path)
    }

    /// Remove any exported archives for a project; missing files are fine
    pub fn remove(&self, project_id: Uuid) -> Result<(), PlatformError> {
        for format in [ArchiveFormat::Zip, ArchiveFormat::TarGz] {
            let path = self.archive_path(project_id, format);
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

fn write_zip(path: &Path, files: &[GeneratedFile]) -> Result<(), PlatformError> {
    let file = File::create(path)?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);

    for generated in files {
        writer
            .start_file(generated.path.as_str(), options)
            .map_err(|e| PlatformError::Archive(e.to_string()))?;
        writer.write_all(generated.content.as_bytes())?;
    }

    writer
        .finish()
        .map_err(|e| PlatformError::Archive(e.to_string()))?;
    Ok(())
}

fn write_tar_gz(path: &Path, files: &[GeneratedFile]) -> Result<(), PlatformError> {
    let file = File::create(path)?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for generated in files {
        let bytes = generated.content.as_bytes();
        let mut header = tar::Header::new_gnu();
        header.set_size(bytes.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, &generated.path, bytes)
            .map_err(|e| PlatformError::Archive(e.to_string()))?;
    }

    let encoder = builder
        .into_inner()
        .map_err(|e| PlatformError::Archive(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| PlatformError::Archive(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use tempfile::TempDir;

    fn sample_files() -> Vec<GeneratedFile> {
        vec![
            GeneratedFile::new("package.json", "{\"name\":\"todo\"}", "json", "manifest"),
            GeneratedFile::new("src/App.tsx", "export default function App() {}", "typescript", "root"),
        ]
    }

    #[test]
    fn test_zip_export_roundtrip() {
        let dir = TempDir::new().unwrap();
        let exporter = ArchiveExporter::new(dir.path());
        let id = Uuid::new_v4();

        let path = exporter.export(id, &sample_files(), ArchiveFormat::Zip).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            format!("{}.zip", id)
        );

        let mut archive = zip::ZipArchive::new(File::open(&path).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);

        let mut entry = archive.by_name("src/App.tsx").unwrap();
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        assert_eq!(content, "export default function App() {}");
    }

    #[test]
    fn test_tar_gz_export_roundtrip() {
        let dir = TempDir::new().unwrap();
        let exporter = ArchiveExporter::new(dir.path());
        let id = Uuid::new_v4();

        let path = exporter
            .export(id, &sample_files(), ArchiveFormat::TarGz)
            .unwrap();
        assert!(path.to_str().unwrap().ends_with(&format!("{}.tar.gz", id)));

        let decoder = GzDecoder::new(File::open(&path).unwrap());
        let mut archive = tar::Archive::new(decoder);
        let names: Vec<String> = archive
            .entries()
            .unwrap()
            .map(|e| e.unwrap().path().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["package.json", "src/App.tsx"]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let exporter = ArchiveExporter::new(dir.path());
        let id = Uuid::new_v4();

        let path = exporter.export(id, &sample_files(), ArchiveFormat::Zip).unwrap();
        assert!(path.exists());

        exporter.remove(id).unwrap();
        assert!(!path.exists());
        exporter.remove(id).unwrap();
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(ArchiveFormat::parse("zip"), Some(ArchiveFormat::Zip));
        assert_eq!(ArchiveFormat::parse("tgz"), Some(ArchiveFormat::TarGz));
        assert_eq!(ArchiveFormat::parse("rar"), None);
    }
}
