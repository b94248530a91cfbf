use sha2::{Digest, Sha256};

/// Hashes an identifier for logging so raw player ids never appear in
/// log output. Stable for a given salt, useless for lookup without it.
pub fn log_safe_id(id: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(id.as_bytes());
    let digest = hasher.finalize();

    digest[..6].iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_and_salted() {
        let a = log_safe_id("alice", "salt-one");
        assert_eq!(a, log_safe_id("alice", "salt-one"));
        assert_ne!(a, log_safe_id("alice", "salt-two"));
        assert_ne!(a, log_safe_id("bob", "salt-one"));
        assert_eq!(a.len(), 12);
        assert!(!a.contains("alice"));
    }
}
