// src/engine/scorer.rs

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use crate::{
    engine::{classify::classify, error::EngineError},
    models::{
        exam_result::{BucketStats, ExamRecord, ExamResult, IncorrectQuestion, Verdict},
        profile::StudentProfile,
        question::{Choice, Question},
    },
    repository::{ProfileReader, QuestionBank, ResultStore},
};

/// Rounds to two decimal places; exact halves go to the even neighbour.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// `score / total` as a percentage with two decimals; zero when nothing was graded.
pub fn percentage(score: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(score as f64 / total as f64 * 100.0)
}

fn review_reference(topic: &str) -> String {
    let topic = topic.trim();
    if topic.is_empty() {
        "Review this topic".to_string()
    } else {
        format!("Review: {}", topic)
    }
}

/// Parses submitted option letters, rejecting anything outside A-D.
pub fn parse_answers(raw: &HashMap<i64, String>) -> Result<BTreeMap<i64, Choice>, EngineError> {
    raw.iter()
        .map(|(id, letter)| {
            letter
                .parse::<Choice>()
                .map(|choice| (*id, choice))
                .map_err(|e| EngineError::Validation(format!("question {}: {}", id, e)))
        })
        .collect()
}

/// Grades `answers` against the bank snapshot in `bank`.
///
/// Answers whose question is no longer in the bank are skipped and do not
/// count toward `total`. Questions the classifier rejects still count toward
/// `score`/`total` but stay out of the per-bucket tallies.
pub fn grade(
    profile: &StudentProfile,
    answers: &BTreeMap<i64, Choice>,
    bank: &HashMap<i64, Question>,
    created_at: DateTime<Utc>,
) -> ExamResult {
    let mut score = 0u32;
    let mut total = 0u32;
    let mut performance: BTreeMap<String, BucketStats> = BTreeMap::new();
    let mut incorrect = Vec::new();

    for (id, selected) in answers {
        let Some(question) = bank.get(id) else {
            tracing::debug!("Skipping answer to question {} which is no longer in the bank", id);
            continue;
        };

        total += 1;
        let correct = *selected == question.answer;
        if correct {
            score += 1;
        }

        if let Some(bucket) = classify(question, profile) {
            let stats = performance.entry(bucket.label().to_string()).or_default();
            stats.total += 1;
            if correct {
                stats.correct += 1;
            }
        }

        if !correct {
            incorrect.push(IncorrectQuestion {
                id: question.id,
                subject: question.subject.clone(),
                topic: question.topic.clone(),
                difficulty: question.difficulty,
                question: question.question.clone(),
                correct_answer: question.answer,
                student_answer: *selected,
                reference: review_reference(&question.topic),
            });
        }
    }

    let percentage = percentage(score, total);
    let result = if percentage >= f64::from(profile.required_passing_threshold) {
        Verdict::Pass
    } else {
        Verdict::Fail
    };

    ExamResult {
        user_id: profile.user_id,
        exam_type: profile.target_licensure.clone(),
        score,
        total,
        percentage,
        result,
        subject_performance: performance,
        incorrect_questions: incorrect,
        created_at,
    }
}

/// Grades a submission for `user_id` and appends the result to the store.
pub async fn score_exam<S>(
    store: &S,
    user_id: i64,
    raw_answers: &HashMap<i64, String>,
) -> Result<ExamRecord, EngineError>
where
    S: QuestionBank + ProfileReader + ResultStore + ?Sized,
{
    let profile = store
        .get_profile(user_id)
        .await?
        .ok_or_else(|| EngineError::NotFound("profile not found".to_string()))?;
    let answers = parse_answers(raw_answers)?;

    let ids: Vec<i64> = answers.keys().copied().collect();
    let bank: HashMap<i64, Question> = store
        .get_questions(&ids)
        .await?
        .into_iter()
        .map(|q| (q.id, q))
        .collect();

    let result = grade(&profile, &answers, &bank, Utc::now());
    let id = store.save_result(&result).await?;

    tracing::info!(
        "Exam submitted by user {}: score {}/{} ({}%) {}",
        user_id,
        result.score,
        result.total,
        result.percentage,
        result.result.as_str()
    );

    Ok(ExamRecord { id, result })
}
