pub mod checksum;

pub use checksum::{ChecksumVerifier, VerificationError, verify_file};
