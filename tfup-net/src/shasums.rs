// tfup-net/src/shasums.rs
//! Parsing of SHA256SUMS manifests in the coreutils `sha256sum` line format:
//! `<hex-digest> <whitespace> [*]<filename>`. The `*` marker denotes binary
//! mode and is stripped before filename comparison.

/// Find the digest for `filename` in a SHA256SUMS manifest by exact filename
/// match. Malformed lines are skipped.
pub fn find_digest(manifest: &str, filename: &str) -> Option<String> {
    for line in manifest.lines() {
        let mut parts = line.split_whitespace();
        let digest = match parts.next() {
            Some(d) => d,
            None => continue,
        };
        let entry_name = match parts.next() {
            Some(n) => n.strip_prefix('*').unwrap_or(n),
            None => continue,
        };
        if entry_name == filename {
            return Some(digest.to_string());
        }
    }
    None
}
