// zipkeep-core/src/archive.rs
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::debug;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};
use zipkeep_common::error::{Result, ZipkeepError};

/// Handle to a freshly written archive.
#[derive(Debug, Clone)]
pub struct ArtifactRef {
    pub path: PathBuf,
    pub size: u64,
}

/// Archives every regular file under `source` into a timestamped zip in
/// `destination`, stored under paths relative to the source root.
///
/// Returns `Ok(None)` without touching the destination when `source` has no
/// top-level entries. The check is shallow: a source holding only empty
/// subdirectories still produces an archive, possibly with zero entries.
pub fn create_archive(
    source: &Path,
    destination: &Path,
    timestamp_format: &str,
) -> Result<Option<ArtifactRef>> {
    if !source.is_dir() {
        return Err(ZipkeepError::InvalidSource(format!(
            "{} does not exist or is not a directory",
            source.display()
        )));
    }

    if is_dir_empty(source)? {
        debug!("Source {} is empty, no archive created", source.display());
        return Ok(None);
    }

    fs::create_dir_all(destination).map_err(|e| {
        ZipkeepError::DestinationUnwritable(format!("{}: {}", destination.display(), e))
    })?;

    let timestamp = Local::now().format(timestamp_format).to_string();
    let zip_name = format!("{}_{}.zip", source_base_name(source)?, timestamp);
    let zip_path = destination.join(&zip_name);
    debug!("Writing archive {}", zip_path.display());

    // A second invocation within the same timestamp resolution overwrites
    // the first artifact silently.
    let file = File::create(&zip_path).map_err(|e| {
        ZipkeepError::DestinationUnwritable(format!("{}: {}", zip_path.display(), e))
    })?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(source) {
        let entry = entry.map_err(|e| ZipkeepError::from(io::Error::from(e)))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(source).map_err(|e| {
            ZipkeepError::Generic(format!(
                "Path {} escapes source root: {}",
                entry.path().display(),
                e
            ))
        })?;
        writer.start_file(archive_entry_name(relative), options)?;
        let mut reader = File::open(entry.path())?;
        io::copy(&mut reader, &mut writer)?;
    }

    writer.finish()?;
    let size = fs::metadata(&zip_path)?.len();
    Ok(Some(ArtifactRef {
        path: zip_path,
        size,
    }))
}

fn is_dir_empty(dir: &Path) -> Result<bool> {
    Ok(fs::read_dir(dir)?.next().is_none())
}

/// Final path component of the source after normalizing away trailing
/// separators; falls back to the canonicalized path for spellings like `.`.
fn source_base_name(source: &Path) -> Result<String> {
    if let Some(name) = source.file_name() {
        return Ok(name.to_string_lossy().into_owned());
    }
    source
        .canonicalize()?
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            ZipkeepError::InvalidSource(format!(
                "cannot derive an archive name from {}",
                source.display()
            ))
        })
}

fn archive_entry_name(relative: &Path) -> String {
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    parts.join("/")
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::io::Read;

    use tempfile::tempdir;
    use zip::ZipArchive;

    use super::*;

    fn read_archive(path: &Path) -> BTreeMap<String, Vec<u8>> {
        let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut contents = BTreeMap::new();
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).unwrap();
            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes).unwrap();
            contents.insert(entry.name().to_string(), bytes);
        }
        contents
    }

    #[test]
    fn archive_reproduces_source_tree() {
        let source = tempdir().unwrap();
        let dest = tempdir().unwrap();
        fs::write(source.path().join("top.txt"), b"top level").unwrap();
        fs::create_dir_all(source.path().join("nested/deeper")).unwrap();
        fs::write(source.path().join("nested/mid.log"), b"middle").unwrap();
        fs::write(source.path().join("nested/deeper/leaf.bin"), b"\x00\x01\x02").unwrap();

        let artifact = create_archive(source.path(), dest.path(), "%Y%m%d_%H%M%S")
            .unwrap()
            .expect("non-empty source must produce an artifact");
        assert!(artifact.path.exists());
        assert_eq!(artifact.size, fs::metadata(&artifact.path).unwrap().len());

        let contents = read_archive(&artifact.path);
        assert_eq!(contents.len(), 3);
        assert_eq!(contents["top.txt"], b"top level");
        assert_eq!(contents["nested/mid.log"], b"middle");
        assert_eq!(contents["nested/deeper/leaf.bin"], b"\x00\x01\x02");
    }

    #[test]
    fn empty_source_is_a_no_op() {
        let source = tempdir().unwrap();
        let dest = tempdir().unwrap();
        let result = create_archive(source.path(), dest.path(), "%Y%m%d_%H%M%S").unwrap();
        assert!(result.is_none());
        assert_eq!(fs::read_dir(dest.path()).unwrap().count(), 0);
    }

    #[test]
    fn source_with_only_empty_subdir_still_archives() {
        let source = tempdir().unwrap();
        let dest = tempdir().unwrap();
        fs::create_dir(source.path().join("hollow")).unwrap();

        let artifact = create_archive(source.path(), dest.path(), "%Y%m%d_%H%M%S")
            .unwrap()
            .expect("shallow emptiness check must not recurse");
        assert!(read_archive(&artifact.path).is_empty());
    }

    #[test]
    fn missing_source_is_fatal() {
        let dest = tempdir().unwrap();
        let err = create_archive(Path::new("/no/such/zipkeep/source"), dest.path(), "%Y%m%d")
            .unwrap_err();
        assert!(matches!(err, ZipkeepError::InvalidSource(_)));
    }

    #[test]
    fn artifact_name_uses_source_base_name() {
        let source = tempdir().unwrap();
        let dest = tempdir().unwrap();
        fs::write(source.path().join("f"), b"x").unwrap();

        let artifact = create_archive(source.path(), dest.path(), "%Y%m%d_%H%M%S")
            .unwrap()
            .unwrap();
        let base = source.path().file_name().unwrap().to_string_lossy();
        let name = artifact.path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with(&format!("{base}_")));
        assert!(name.ends_with(".zip"));
    }

    #[test]
    fn destination_is_created_with_parents() {
        let source = tempdir().unwrap();
        let dest = tempdir().unwrap();
        fs::write(source.path().join("f"), b"x").unwrap();
        let nested_dest = dest.path().join("a/b/c");

        let artifact = create_archive(source.path(), &nested_dest, "%Y%m%d_%H%M%S")
            .unwrap()
            .unwrap();
        assert!(artifact.path.starts_with(&nested_dest));
    }
}
