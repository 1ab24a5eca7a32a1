pub const KEY_SEPARATOR: char = '/';

/// Final `/`-delimited segment of an object key. A key without separators is
/// returned whole; a key ending in `/` yields an empty name.
pub fn display_name(key: &str) -> &str {
    key.rsplit(KEY_SEPARATOR).next().unwrap_or(key)
}
