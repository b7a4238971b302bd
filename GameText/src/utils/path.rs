//! Path utilities

use std::path::Path;

/// Normalize path separators to forward slashes (game paths use `\`)
pub fn normalize_path<P: AsRef<Path>>(path: P) -> String {
    path.as_ref().to_string_lossy().replace('\\', "/")
}

/// Substitute `{language}` in a path template
pub fn expand_language(template: &str, language: &str) -> String {
    template.replace("{language}", language)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("data\\English\\Generals.csf"), "data/English/Generals.csf");
        assert_eq!(normalize_path("data/map.str"), "data/map.str");
    }

    #[test]
    fn test_expand_language() {
        assert_eq!(
            expand_language("data/{language}/Generals.csf", "German"),
            "data/German/Generals.csf"
        );
        assert_eq!(expand_language("data/Generals.str", "German"), "data/Generals.str");
    }
}
