// src/models/question.rs

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Difficulty tag carried by every bank question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Fixed order used whenever difficulty levels are iterated.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}

/// One of the four option letters of a multiple-choice question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Choice {
    A,
    B,
    C,
    D,
}

impl Choice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Choice::A => "A",
            Choice::B => "B",
            Choice::C => "C",
            Choice::D => "D",
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts surrounding whitespace and lower-case letters.
impl FromStr for Choice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Choice::A),
            "B" => Ok(Choice::B),
            "C" => Ok(Choice::C),
            "D" => Ok(Choice::D),
            other => Err(format!("'{}' is not one of A, B, C or D", other)),
        }
    }
}

/// A question from the bank.
/// The engine only ever reads these; curation happens elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,

    /// Licensure the question belongs to, e.g. "LET" or "CPA".
    pub exam_type: String,

    /// Free-text subject label as imported (e.g. "GenEd", "Prof Ed", "Mathematics").
    pub subject: String,

    pub topic: String,

    pub difficulty: Difficulty,

    /// The prompt text.
    pub question: String,

    pub a: String,
    pub b: String,
    pub c: String,
    pub d: String,

    /// The correct option.
    pub answer: Choice,
}

/// DTO for sending a question to the student (no answer key).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublicQuestion {
    pub id: i64,
    pub question: String,
    pub a: String,
    pub b: String,
    pub c: String,
    pub d: String,
    pub difficulty: Difficulty,
}

impl From<&Question> for PublicQuestion {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id,
            question: q.question.clone(),
            a: q.a.clone(),
            b: q.b.clone(),
            c: q.c.clone(),
            d: q.d.clone(),
            difficulty: q.difficulty,
        }
    }
}
