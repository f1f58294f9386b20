// src/core/paths.rs

/// Whether the host filesystem compares paths case-insensitively.
const HOST_CASE_INSENSITIVE: bool = cfg!(target_os = "windows");

/// Canonicalizes a path string to forward slashes.
///
/// Collapses duplicate separators, drops `.` segments, resolves `..`
/// lexically and strips the trailing separator (a bare root is kept). When
/// `fold_case` is set and the host is case-insensitive the result is
/// lower-cased, so two spellings of one path compare equal.
///
/// Purely lexical: the filesystem is never touched and symlinks are not
/// resolved. `normalize_path(&normalize_path(p, f), f) == normalize_path(p, f)`.
pub fn normalize_path(path: &str, fold_case: bool) -> String {
    normalize_path_with(path, fold_case, HOST_CASE_INSENSITIVE)
}

/// Same as [`normalize_path`] with the host's case sensitivity made explicit.
pub fn normalize_path_with(path: &str, fold_case: bool, host_case_insensitive: bool) -> String {
    let unified = path.replace('\\', "/");
    let (drive, rest) = split_drive(&unified);
    let absolute = rest.starts_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                // `..` above the root stays at the root.
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let body = segments.join("/");
    let normalized = if absolute {
        format!("{}/{}", drive, body)
    } else if body.is_empty() && drive.is_empty() {
        ".".to_string()
    } else {
        format!("{}{}", drive, body)
    };

    if fold_case && host_case_insensitive {
        normalized.to_lowercase()
    } else {
        normalized
    }
}

/// Splits a leading `X:` drive designator off the path.
fn split_drive(path: &str) -> (&str, &str) {
    let mut chars = path.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), Some(':')) if letter.is_ascii_alphabetic() => path.split_at(2),
        _ => ("", path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separators_are_unified_and_collapsed() {
        assert_eq!(normalize_path_with(r"a\b\\c", false, false), "a/b/c");
        assert_eq!(normalize_path_with("/usr//local///bin", false, false), "/usr/local/bin");
    }

    #[test]
    fn test_trailing_separator_is_stripped() {
        assert_eq!(normalize_path_with("/home/user/", false, false), "/home/user");
        assert_eq!(normalize_path_with(r"build\", false, false), "build");
        assert_eq!(normalize_path_with("/", false, false), "/");
        assert_eq!(normalize_path_with(r"C:\", false, false), "C:/");
    }

    #[test]
    fn test_dot_segments() {
        assert_eq!(normalize_path_with("./a/./b/../c", false, false), "a/c");
        assert_eq!(normalize_path_with("a/../..", false, false), "..");
        assert_eq!(normalize_path_with("/../a", false, false), "/a");
        assert_eq!(normalize_path_with("", false, false), ".");
    }

    #[test]
    fn test_case_folding_only_on_case_insensitive_hosts() {
        assert_eq!(normalize_path_with(r"C:\Users\Dev", true, true), "c:/users/dev");
        assert_eq!(normalize_path_with(r"C:\Users\Dev", false, true), "C:/Users/Dev");
        assert_eq!(normalize_path_with("/Users/Dev", true, false), "/Users/Dev");
    }

    #[test]
    fn test_idempotent_on_samples() {
        for sample in [r"C:\a\..\B\", "//x//y//", "../../z", "a:b/c", ".", "..//"] {
            let once = normalize_path_with(sample, true, true);
            assert_eq!(normalize_path_with(&once, true, true), once, "sample '{}'", sample);
        }
    }
}
