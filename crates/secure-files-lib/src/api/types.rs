use serde::{Deserialize, Serialize};

/// One entry of the project's secure file listing.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SecureFileRecord {
    pub id: u64,
    /// Relative path the file is written to under the download root.
    pub name: String,
    /// Hex-encoded digest of the expected content.
    pub checksum: String,
    #[serde(default)]
    pub checksum_algorithm: String,
}
