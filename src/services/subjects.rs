//! Static subject catalog. Storage accepts any subject key; this list only
//! drives display labels, so an unknown key falls back to itself.

pub const SUBJECTS: &[(&str, &str)] = &[
    ("japanese", "Japanese"),
    ("math", "Math"),
    ("english", "English"),
    ("science", "Science"),
    ("social", "Social Studies"),
];

pub fn label(key: &str) -> &str {
    SUBJECTS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| *label)
        .unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_keys_resolve_and_unknown_fall_through() {
        assert_eq!(label("math"), "Math");
        assert_eq!(label("calligraphy"), "calligraphy");
    }
}
