// src/core/text.rs

// Small string helpers shared by the marshaller and the CLI.

/// Escapes every regex metacharacter so `text` matches itself literally.
pub fn escape_for_regex(text: &str) -> String {
    regex::escape(text)
}

/// Replaces every literal occurrence of `needle` in `haystack`.
///
/// An empty needle leaves the input untouched.
pub fn replace_all(haystack: &str, needle: &str, with: &str) -> String {
    if needle.is_empty() {
        return haystack.to_string();
    }
    haystack.replace(needle, with)
}

/// Removes every occurrence of each pattern, applied in order.
pub fn remove_all_patterns<S: AsRef<str>>(text: &str, patterns: &[S]) -> String {
    patterns
        .iter()
        .fold(text.to_string(), |acc, pattern| replace_all(&acc, pattern.as_ref(), ""))
}

/// Cartesian product of the given lists.
///
/// `product(&[vec![1, 2], vec![3]])` yields `[[1, 3], [2, 3]]`. No lists at
/// all yields a single empty combination; any empty list yields none.
pub fn product<T: Clone>(lists: &[Vec<T>]) -> Vec<Vec<T>> {
    lists.iter().fold(vec![Vec::new()], |combos, list| {
        combos
            .iter()
            .flat_map(|prefix| {
                list.iter().map(move |item| {
                    let mut next = prefix.clone();
                    next.push(item.clone());
                    next
                })
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_all_patterns() {
        assert_eq!(remove_all_patterns("a-b-c", &["-b"]), "ac");
        assert_eq!(remove_all_patterns("x.y.z", &[".", "z"]), "xy");
    }

    #[test]
    fn test_replace_all_is_literal() {
        assert_eq!(replace_all("a.b.c", ".", "/"), "a/b/c");
        assert_eq!(replace_all("a*b", "*", "+"), "a+b");
        assert_eq!(replace_all("abc", "", "-"), "abc");
    }

    #[test]
    fn test_escape_for_regex_matches_literally() {
        let escaped = escape_for_regex("a.b(c)");
        let re = regex::Regex::new(&format!("^{}$", escaped)).unwrap();
        assert!(re.is_match("a.b(c)"));
        assert!(!re.is_match("axb(c)"));
    }

    #[test]
    fn test_product() {
        let combos = product(&[vec!["gcc", "clang"], vec!["Debug", "Release"]]);
        assert_eq!(
            combos,
            vec![
                vec!["gcc", "Debug"],
                vec!["gcc", "Release"],
                vec!["clang", "Debug"],
                vec!["clang", "Release"],
            ]
        );
    }

    #[test]
    fn test_product_edge_cases() {
        let none: Vec<Vec<u8>> = Vec::new();
        assert_eq!(product(&none), vec![Vec::<u8>::new()]);
        assert!(product(&[vec![1], vec![]]).is_empty());
    }
}
