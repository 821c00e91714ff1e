//! Path prefix matching.
//!
//! # Design Decisions
//! - Plain, case-sensitive string prefix test (no segment awareness)
//! - Longest registered prefix wins, so the result does not depend on map
//!   iteration order

/// Pick the longest of `prefixes` that `path` starts with.
///
/// Two distinct prefixes of equal length cannot both match the same path, so
/// the answer is unique.
pub fn longest_prefix<'a, I>(prefixes: I, path: &str) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    prefixes
        .into_iter()
        .filter(|prefix| path.starts_with(prefix))
        .max_by_key(|prefix| prefix.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_string_prefix() {
        let prefixes = ["/api"];
        assert_eq!(longest_prefix(prefixes, "/api/v1"), Some("/api"));
        assert_eq!(longest_prefix(prefixes, "/apiary"), Some("/api"));
        assert_eq!(longest_prefix(prefixes, "/API"), None);
    }

    #[test]
    fn test_longest_prefix_wins() {
        let prefixes = ["/a", "/ab", "/abcd"];
        assert_eq!(longest_prefix(prefixes, "/abc"), Some("/ab"));
        assert_eq!(longest_prefix(prefixes, "/abcde"), Some("/abcd"));
        assert_eq!(longest_prefix(prefixes, "/a"), Some("/a"));
        assert_eq!(longest_prefix(prefixes, "/b"), None);
    }

    #[test]
    fn test_longest_prefix_ignores_order() {
        let forward = ["/", "/ping", "/pong"];
        let backward = ["/pong", "/ping", "/"];
        assert_eq!(longest_prefix(forward, "/pong/extra"), Some("/pong"));
        assert_eq!(longest_prefix(backward, "/pong/extra"), Some("/pong"));
        assert_eq!(longest_prefix(backward, "/other"), Some("/"));
    }
}
