//! Shared key generation for storage backends.
//!
//! Keys are collision-resistant by construction: 256 bits of CSPRNG output,
//! base64 URL-safe without padding. No existence check is performed against
//! the backend; the keyspace makes collisions a non-concern.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::RngCore;

fn random_token() -> String {
    let mut raw = [0u8; 32];
    rand::rng().fill_bytes(&mut raw);
    URL_SAFE_NO_PAD.encode(raw)
}

/// Generate an object key under an orientation namespace:
/// `{prefix}/{random}.{extension}`.
pub fn generate_object_key(prefix: &str, extension: &str) -> String {
    format!("{}/{}.{}", prefix, random_token(), extension)
}

/// Generate a flat asset filename: `{random}.{extension}`.
pub fn generate_asset_filename(extension: &str) -> String {
    format!("{}.{}", random_token(), extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn object_key_has_prefix_and_extension() {
        let key = generate_object_key("landscape", "mp4");
        assert!(key.starts_with("landscape/"));
        assert!(key.ends_with(".mp4"));
        // 32 bytes -> 43 base64url chars without padding
        let token = &key["landscape/".len()..key.len() - ".mp4".len()];
        assert_eq!(token.len(), 43);
        assert!(!token.contains('='));
        assert!(!token.contains('+'));
        assert!(!token.contains('/'));
    }

    #[test]
    fn keys_are_pairwise_distinct() {
        let keys: HashSet<_> = (0..1024)
            .map(|_| generate_object_key("other", "mp4"))
            .collect();
        assert_eq!(keys.len(), 1024);
    }

    #[test]
    fn asset_filename_has_no_separator() {
        let filename = generate_asset_filename("png");
        assert!(!filename.contains('/'));
        assert!(filename.ends_with(".png"));
    }
}
