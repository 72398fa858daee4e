use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Rate-limit identity of a caller. Only the SHA-256 digest of the
/// originating address is kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientKey(String);

impl ClientKey {
    pub const ANONYMOUS: &'static str = "anonymous";

    pub fn from_address(address: &str) -> Self {
        let address = address.trim();
        let address = if address.is_empty() {
            Self::ANONYMOUS
        } else {
            address
        };

        let mut hasher = Sha256::new();
        hasher.update(address.as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn anonymous() -> Self {
        Self::from_address(Self::ANONYMOUS)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClientKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
