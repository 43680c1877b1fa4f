use crate::api::SecureFileRecord;
use crate::error::SecureFilesError;
use sha2::{Digest, Sha256};
use std::path::Path;
use thiserror::Error;
use tokio::io::AsyncReadExt;

const READ_BUFFER_SIZE: usize = 64 * 1024;

#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("Verification failed: expected {expected}, got {actual}")]
    VerificationFailed { expected: String, actual: String },
}

/// Incremental SHA-256 check against a hex digest.
pub struct ChecksumVerifier {
    hasher: Sha256,
    expected_digest: String,
}

impl ChecksumVerifier {
    #[inline]
    pub fn new(expected_digest: impl Into<String>) -> Self {
        Self {
            hasher: Sha256::new(),
            expected_digest: expected_digest.into(),
        }
    }

    #[inline]
    pub fn update(&mut self, data: impl AsRef<[u8]>) {
        Digest::update(&mut self.hasher, data.as_ref());
    }

    /// Consumes the verifier and compares digests, ignoring hex case.
    pub fn verify(self) -> Result<(), VerificationError> {
        let actual_digest = hex::encode(self.hasher.finalize());
        let expected_digest = self.expected_digest.trim();

        if actual_digest.eq_ignore_ascii_case(expected_digest) {
            Ok(())
        } else {
            Err(VerificationError::VerificationFailed {
                expected: expected_digest.to_string(),
                actual: actual_digest,
            })
        }
    }
}

/// Re-reads `local_path` in full and checks it against `record.checksum`.
///
/// `record.checksum_algorithm` is informational; SHA-256 is always used.
pub async fn verify_file(
    record: &SecureFileRecord,
    local_path: &Path,
) -> Result<(), SecureFilesError> {
    let file = tokio::fs::File::open(local_path)
        .await
        .map_err(|e| SecureFilesError::io(local_path, e))?;
    let mut reader = tokio::io::BufReader::new(file);
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];
    let mut verifier = ChecksumVerifier::new(record.checksum.as_str());

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .await
            .map_err(|e| SecureFilesError::io(local_path, e))?;
        if bytes_read == 0 {
            break;
        }
        verifier.update(&buffer[..bytes_read]);
    }

    verifier.verify().map_err(|err| match err {
        VerificationError::VerificationFailed { expected, actual } => {
            SecureFilesError::ChecksumMismatch {
                file_name: record.name.clone(),
                expected,
                actual,
            }
        }
    })
}
