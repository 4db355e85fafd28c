// Content hashing for change detection
//
// Blake3 hex digests (64 chars) over the raw bytes.

/// Blake3 hex digest of a string
pub fn hash_content(content: &str) -> String {
    hash_bytes(content.as_bytes())
}

pub fn hash_bytes(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}
