//! Server-side script handles.

use once_cell::sync::Lazy;
use sha2::{Digest, Sha256};

/// A handle to a server-executed script.
///
/// The handle pairs the script source with its SHA-256 digest, computed once
/// at registration. Stores that pre-load scripts dispatch on the digest;
/// stores that do not can fall back to the source text. Handles are immutable
/// and meant to live in statics shared by every client in the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    source: &'static str,
    digest: [u8; 32],
}

impl Script {
    /// Registers a script from its source text.
    #[must_use]
    pub fn new(source: &'static str) -> Self {
        let digest = Sha256::digest(source.as_bytes()).into();
        Self { source, digest }
    }

    /// Returns the script source.
    pub fn source(&self) -> &'static str {
        self.source
    }

    /// Returns the SHA-256 digest of the source.
    pub fn digest(&self) -> &[u8; 32] {
        &self.digest
    }

    /// Returns the digest as a lowercase hex string.
    pub fn digest_hex(&self) -> String {
        self.digest.iter().map(|b| format!("{b:02x}")).collect()
    }
}

/// Source of the check-and-set save procedure.
///
/// Given KEYS[1] = target key, ARGV[1] = version field path, ARGV[2] =
/// expected version string, ARGV[3] = new document JSON: if no value exists
/// at the version path, or the stored value equals ARGV[2], the whole
/// document is replaced and the stored version field is incremented by 1,
/// returning the new version. Otherwise nothing is mutated and no value is
/// returned.
const CHECKED_SAVE_SOURCE: &str = r#"
local v = redis.call('JSON.GET',KEYS[1],ARGV[1])
if (not v or v == ARGV[2])
then
  redis.call('JSON.SET',KEYS[1],'$',ARGV[3])
  return redis.call('JSON.NUMINCRBY',KEYS[1],ARGV[1],1)
end
return nil
"#;

static CHECKED_SAVE: Lazy<Script> = Lazy::new(|| Script::new(CHECKED_SAVE_SOURCE));

/// Returns the process-wide check-and-set save script.
///
/// Registered once; every repository instance shares this handle.
pub fn checked_save_script() -> &'static Script {
    &CHECKED_SAVE
}
