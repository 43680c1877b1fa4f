mod client;
mod types;

pub use client::SecureFilesClient;
pub use types::SecureFileRecord;
