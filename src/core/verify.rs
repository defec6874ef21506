// ─── Content Verifier ───
// Streaming file digests used for skip checks and post-download validation.

use std::path::Path;

use md5::Md5;
use sha1::{Digest, Sha1};
use sha2::Sha256;
use tokio::io::AsyncReadExt;

use crate::core::error::{LauncherError, LauncherResult};

const CHUNK_SIZE: usize = 8192;

/// Digest algorithms a download can be checked against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HashAlgorithm {
    /// The scheme used by every Mojang manifest.
    #[default]
    Sha1,
    Sha256,
    Md5,
}

/// Hash the file at `path` in fixed-size chunks and return the lowercase hex
/// digest, or `None` when the file does not exist.
pub async fn hash_file(path: &Path, algorithm: HashAlgorithm) -> LauncherResult<Option<String>> {
    let file = match tokio::fs::File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(LauncherError::io(path, e)),
    };

    let digest = match algorithm {
        HashAlgorithm::Sha1 => digest_file::<Sha1>(file, path).await?,
        HashAlgorithm::Sha256 => digest_file::<Sha256>(file, path).await?,
        HashAlgorithm::Md5 => digest_file::<Md5>(file, path).await?,
    };
    Ok(Some(digest))
}

/// `true` iff the file exists and its SHA-1 equals `expected` (case-insensitive).
pub async fn matches_sha1(path: &Path, expected: &str) -> LauncherResult<bool> {
    Ok(hash_file(path, HashAlgorithm::Sha1)
        .await?
        .is_some_and(|actual| actual.eq_ignore_ascii_case(expected)))
}

async fn digest_file<D: Digest>(mut file: tokio::fs::File, path: &Path) -> LauncherResult<String> {
    let mut hasher = D::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = file
            .read(&mut buf)
            .await
            .map_err(|e| LauncherError::io(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn known_digests_of_hello() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("hello.txt");
        std::fs::write(&path, b"hello").unwrap();

        assert_eq!(
            hash_file(&path, HashAlgorithm::Sha1).await.unwrap().as_deref(),
            Some("aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d")
        );
        assert_eq!(
            hash_file(&path, HashAlgorithm::Sha256).await.unwrap().as_deref(),
            Some("2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824")
        );
        assert_eq!(
            hash_file(&path, HashAlgorithm::Md5).await.unwrap().as_deref(),
            Some("5d41402abc4b2a76b9719d911017c592")
        );
    }

    #[tokio::test]
    async fn missing_file_is_none_not_error() {
        let temp = tempfile::tempdir().unwrap();
        let digest = hash_file(&temp.path().join("absent"), HashAlgorithm::default())
            .await
            .unwrap();
        assert!(digest.is_none());
    }

    #[tokio::test]
    async fn files_larger_than_one_chunk_hash_whole_content() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("big.bin");
        let data = vec![7u8; CHUNK_SIZE * 3 + 17];
        std::fs::write(&path, &data).unwrap();

        let expected = hex::encode(Sha1::digest(&data));
        assert!(matches_sha1(&path, &expected).await.unwrap());
        assert!(matches_sha1(&path, &expected.to_uppercase()).await.unwrap());
        assert!(!matches_sha1(&path, "0000").await.unwrap());
    }
}
