use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::UploadError;

/// URL prefix under which stored uploads are served.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Default request size cap for uploads (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// A file that has been written to the uploads directory.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredUpload {
    pub filename: String,
    pub path: PathBuf,
}

impl StoredUpload {
    /// Path clients use to fetch the file back, e.g. `/uploads/1717-42.jpg`.
    pub fn public_url(&self) -> String {
        format!("{}/{}", PUBLIC_PREFIX, self.filename)
    }
}

#[derive(Debug, Clone)]
pub struct UploadDir {
    root: PathBuf,
}

impl UploadDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the directory (and parents) if missing.
    pub async fn ensure_exists(&self) -> Result<(), UploadError> {
        fs::create_dir_all(&self.root)
        .await
        .map_err(|source| UploadError::CreateDir { path: self.root.clone(), source })
    }

    /// Writes `bytes` under a fresh `{millis}-{random}{ext}` name, keeping the
    /// extension of `original_name`.
    pub async fn save(&self, original_name: Option<&str>, bytes: &[u8]) -> Result<StoredUpload, UploadError> {
        self.ensure_exists().await?;

        let filename = unique_filename(original_name);
        let path = self.root.join(&filename);
        let write_err = |source| UploadError::Write { path: path.clone(), source };

        // create_new: a name collision must fail instead of clobbering a file.
        let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .await
        .map_err(write_err)?;
        file.write_all(bytes).await.map_err(write_err)?;
        file.flush().await.map_err(write_err)?;
        file.sync_all().await.map_err(write_err)?;

        Ok(StoredUpload { filename, path })
    }
}

pub fn unique_filename(original_name: Option<&str>) -> String {
    let millis = SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .map(|d| d.as_millis())
    .unwrap_or_default();
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    format!("{}-{}{}", millis, suffix, extension_of(original_name))
}

/// The extension of `name` including its dot, or an empty string. Only short
/// alphanumeric extensions are kept so a client cannot smuggle path segments.
fn extension_of(name: Option<&str>) -> String {
    let ext = name
    .and_then(|n| Path::new(n).extension())
    .and_then(|e| e.to_str())
    .filter(|e| !e.is_empty() && e.len() <= 10 && e.chars().all(|c| c.is_ascii_alphanumeric()));
    match ext {
        Some(ext) => format!(".{}", ext.to_ascii_lowercase()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case(Some("photo.JPG"), ".jpg")]
    #[case(Some("archive.tar.gz"), ".gz")]
    #[case(Some("no_extension"), "")]
    #[case(Some(".hidden"), "")]
    #[case(Some("evil.j/pg"), "")]
    #[case(None, "")]
    fn extension_is_preserved_when_safe(#[case] name: Option<&str>, #[case] expected: &str) {
        assert_eq!(extension_of(name), expected);
    }

    #[test]
    fn filename_has_timestamp_and_random_parts() {
        let name = unique_filename(Some("el-djem.png"));
        let stem = name.strip_suffix(".png").expect("extension kept");
        let (millis, random) = stem.split_once('-').expect("dash separator");
        assert!(millis.parse::<u128>().is_ok(), "bad timestamp in {name}");
        let random: u32 = random.parse().expect("numeric suffix");
        assert!(random < 1_000_000_000);
    }

    #[tokio::test]
    async fn save_writes_bytes_and_creates_directory() {
        let dir = TempDir::new().expect("tempdir");
        let uploads = UploadDir::new(dir.path().join("nested").join("uploads"));

        let stored = uploads.save(Some("carthage.jpeg"), b"fake image").await.expect("save");

        assert!(stored.filename.ends_with(".jpeg"));
        assert_eq!(stored.public_url(), format!("/uploads/{}", stored.filename));
        assert_eq!(stored.path.parent(), Some(uploads.root()));
        let written = std::fs::read(&stored.path).expect("read back");
        assert_eq!(written, b"fake image");
    }

    #[tokio::test]
    async fn saving_twice_yields_distinct_files() {
        let dir = TempDir::new().expect("tempdir");
        let uploads = UploadDir::new(dir.path());

        let first = uploads.save(Some("a.png"), b"1").await.expect("first");
        let second = uploads.save(Some("a.png"), b"2").await.expect("second");

        assert_ne!(first.filename, second.filename);
        assert_eq!(std::fs::read_dir(dir.path()).expect("list").count(), 2);
    }

    #[tokio::test]
    async fn unwritable_root_reports_the_path() {
        let dir = TempDir::new().expect("tempdir");
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").expect("create blocker");
        let uploads = UploadDir::new(&blocker);

        let err = uploads.save(Some("a.png"), b"1").await.expect_err("root is a file");
        match err {
            UploadError::CreateDir { path, .. } => assert_eq!(path, blocker),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
