//! Category normalization and the category colour table.

/// Key used for listings with an empty or missing category.
pub const FALLBACK_KEY: &str = "other";

/// A canonical category: grouping key plus display label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryKey {
    pub key: String,
    pub label: String,
}

/// Canonicalize a free-text category.
///
/// The key is the trimmed, lower-cased value (`"other"` when empty); the label
/// is the key with its first character upper-cased.
pub fn normalize(raw: Option<&str>) -> CategoryKey {
    let key = match raw.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_lowercase(),
        _ => FALLBACK_KEY.to_string(),
    };
    let label = capitalize(&key);
    CategoryKey { key, label }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Display colour for each known category.
///
/// Keys without an entry render with [`CategoryColor::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryColor {
    Electronics,
    Clothing,
    Books,
    Furniture,
    Sports,
    Home,
    Toys,
    Other,
}

impl CategoryColor {
    /// Look up a normalized category key.
    pub fn from_key(key: &str) -> Self {
        match key {
            "electronics" => CategoryColor::Electronics,
            "clothing" => CategoryColor::Clothing,
            "books" => CategoryColor::Books,
            "furniture" => CategoryColor::Furniture,
            "sports" => CategoryColor::Sports,
            "home" => CategoryColor::Home,
            "toys" => CategoryColor::Toys,
            _ => CategoryColor::Other,
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            CategoryColor::Electronics => "#3B82F6",
            CategoryColor::Clothing => "#EC4899",
            CategoryColor::Books => "#F59E0B",
            CategoryColor::Furniture => "#8B5CF6",
            CategoryColor::Sports => "#10B981",
            CategoryColor::Home => "#F97316",
            CategoryColor::Toys => "#EF4444",
            CategoryColor::Other => "#6B7280",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_mixed_case() {
        let category = normalize(Some("ELECTRONICS"));

        assert_eq!(category.key, "electronics");
        assert_eq!(category.label, "Electronics");
    }

    #[test]
    fn test_normalize_missing_or_blank() {
        for raw in [None, Some(""), Some("   ")] {
            let category = normalize(raw);
            assert_eq!(category.key, "other");
            assert_eq!(category.label, "Other");
        }
    }

    #[test]
    fn test_normalize_multi_word_only_capitalizes_first_char() {
        let category = normalize(Some("Home Decor"));

        assert_eq!(category.key, "home decor");
        assert_eq!(category.label, "Home decor");
    }

    #[test]
    fn test_normalize_non_ascii() {
        let category = normalize(Some("Égal"));

        assert_eq!(category.key, "égal");
        assert_eq!(category.label, "Égal");
    }

    #[test]
    fn test_color_lookup_with_fallback() {
        assert_eq!(CategoryColor::from_key("books").hex(), "#F59E0B");
        assert_eq!(CategoryColor::from_key("garden"), CategoryColor::Other);
        assert_eq!(
            CategoryColor::from_key("garden").hex(),
            CategoryColor::Other.hex()
        );
    }
}
