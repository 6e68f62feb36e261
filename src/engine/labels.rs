// src/engine/labels.rs

//! Canonical forms for the free-text subject, topic and major labels found
//! in imported question banks and student profiles.

use std::sync::LazyLock;

use regex::Regex;

static NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("static regex"));

/// Spelling variants seen in bank imports, keyed by their stripped form.
const ALIASES: &[(&str, &str)] = &[
    ("socialscience", "socialstudies"),
    ("socialsciences", "socialstudies"),
    ("socsci", "socialstudies"),
    ("socstud", "socialstudies"),
    ("socialstudies", "socialstudies"),
    ("professional", "professionaleducation"),
    ("profed", "professionaleducation"),
    ("profeduc", "professionaleducation"),
    ("professionaled", "professionaleducation"),
    ("professionaleducation", "professionaleducation"),
    ("general", "gened"),
    ("gened", "gened"),
    ("generaled", "gened"),
    ("generaleducation", "gened"),
    ("math", "mathematics"),
    ("maths", "mathematics"),
    ("mathematics", "mathematics"),
    ("eng", "english"),
    ("fil", "filipino"),
];

/// Words that decorate a major name without changing it.
const MAJOR_QUALIFIERS: &[&str] = &[
    "major",
    "specialization",
    "track",
    "secondary",
    "elementary",
    "let",
];

fn resolve_alias(token: String) -> String {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == token)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or(token)
}

/// Lower-cases and removes everything that is not ASCII alphanumeric.
pub fn strip_label(label: &str) -> String {
    NON_ALNUM
        .replace_all(&label.to_lowercase(), "")
        .into_owned()
}

/// Normalizes a label and resolves it through the alias table.
/// Missing labels normalize to the empty string.
pub fn normalize_label(label: Option<&str>) -> String {
    match label {
        Some(label) => resolve_alias(strip_label(label)),
        None => String::new(),
    }
}

/// Like [`normalize_label`], but first drops qualifier words so that
/// "Mathematics Major" and "Math" land on the same token.
pub fn normalize_major(label: Option<&str>) -> String {
    let Some(label) = label else {
        return String::new();
    };
    let lowered = label.to_lowercase();
    let kept: String = NON_ALNUM
        .split(&lowered)
        .filter(|word| !word.is_empty() && !MAJOR_QUALIFIERS.contains(&word))
        .collect();
    resolve_alias(kept)
}

/// Whether two labels name the same thing.
///
/// Empty labels are never equivalent to anything, including each other.
pub fn labels_equivalent(a: Option<&str>, b: Option<&str>) -> bool {
    let left = normalize_label(a);
    let right = normalize_label(b);
    if left.is_empty() || right.is_empty() {
        return false;
    }
    if left == right
        || left.strip_suffix('s') == Some(right.as_str())
        || right.strip_suffix('s') == Some(left.as_str())
    {
        return true;
    }

    let left_major = normalize_major(a);
    !left_major.is_empty() && left_major == normalize_major(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation_and_case() {
        assert_eq!(normalize_label(Some("  Soc. Sci ")), "socialstudies");
        assert_eq!(normalize_label(Some("Prof-Ed")), "professionaleducation");
        assert_eq!(normalize_label(Some("General")), "gened");
        assert_eq!(normalize_label(Some("Biology 101")), "biology101");
        assert_eq!(normalize_label(None), "");
    }

    #[test]
    fn test_social_science_variants_are_equivalent() {
        assert!(labels_equivalent(Some("Social Science"), Some("SocSci")));
        assert!(labels_equivalent(Some("Social Studies"), Some("socsci")));
    }

    #[test]
    fn test_major_qualifiers_are_ignored() {
        assert!(labels_equivalent(Some("Mathematics Major"), Some("Math")));
        assert!(labels_equivalent(Some("English (Secondary)"), Some("english")));
        assert_eq!(normalize_major(Some("LET Filipino Specialization")), "filipino");
    }

    #[test]
    fn test_unrelated_labels_are_not_equivalent() {
        assert!(!labels_equivalent(Some("English"), Some("ProfEd")));
        assert!(!labels_equivalent(Some("Science"), Some("Mathematics")));
    }

    #[test]
    fn test_trailing_s_is_tolerated() {
        assert!(labels_equivalent(Some("Science"), Some("Sciences")));
        assert!(labels_equivalent(Some("Sciences"), Some("Science")));
    }

    #[test]
    fn test_empty_labels_never_match() {
        assert!(!labels_equivalent(None, None));
        assert!(!labels_equivalent(Some(""), Some("")));
        assert!(!labels_equivalent(Some("---"), Some("English")));
        // Only qualifier words leave nothing to compare.
        assert!(!labels_equivalent(Some("Major"), Some("Track")));
    }
}
