// src/engine/classify.rs

use std::fmt;

use crate::{
    engine::labels::{labels_equivalent, normalize_label, strip_label},
    models::{profile::StudentProfile, question::Question},
};

/// Label used for single-pool questions with a blank subject.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Reporting bucket a question falls into for a given profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Bucket {
    GeneralEducation,
    ProfessionalEducation,
    /// The profile's own major, carrying the profile's spelling of it.
    Major(String),
    /// Generic specialization bucket for profiles without a major.
    Specialization,
    /// Raw subject label, used by single-pool exam types.
    Subject(String),
}

impl Bucket {
    pub fn label(&self) -> &str {
        match self {
            Bucket::GeneralEducation => "General Education",
            Bucket::ProfessionalEducation => "Professional Education",
            Bucket::Major(name) | Bucket::Subject(name) => name,
            Bucket::Specialization => "Specialization",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn is_professional_education(subject: &str, topic: &str) -> bool {
    let stripped = strip_label(subject);
    stripped.starts_with("profed")
        || stripped.starts_with("professional")
        || topic
            .trim()
            .to_lowercase()
            .starts_with("professional education")
}

fn is_general_education(subject: &str) -> bool {
    let stripped = strip_label(subject);
    normalize_label(Some(subject)) == "gened"
        || stripped.starts_with("gened")
        || stripped.starts_with("generaleducation")
}

/// Maps a question to its reporting bucket for `profile`.
///
/// Returns `None` for multi-bucket questions that belong to some other
/// major; those are kept out of both sampling and bucket statistics.
pub fn classify(question: &Question, profile: &StudentProfile) -> Option<Bucket> {
    let subject = question.subject.trim();

    if !profile.uses_buckets() {
        if subject.is_empty() {
            return Some(Bucket::Subject(UNCATEGORIZED.to_string()));
        }
        return Some(Bucket::Subject(subject.to_string()));
    }

    let topic = question.topic.as_str();

    // Education signals win over major matching: bulk imports use loose
    // subject strings that can resemble a major name.
    if is_professional_education(subject, topic) {
        return Some(Bucket::ProfessionalEducation);
    }
    if is_general_education(subject) {
        return Some(Bucket::GeneralEducation);
    }

    match profile.major() {
        Some(major) => {
            // Covers "Specialization"/"Major" subjects whose topic names the major.
            let matches_major = labels_equivalent(Some(subject), Some(major))
                || labels_equivalent(Some(topic), Some(major));
            matches_major.then(|| Bucket::Major(major.to_string()))
        }
        None => Some(Bucket::Specialization),
    }
}
