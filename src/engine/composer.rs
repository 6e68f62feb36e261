// src/engine/composer.rs

use std::collections::{BTreeMap, HashSet};

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    engine::{
        classify::{Bucket, classify},
        difficulty::DifficultyWeights,
        error::EngineError,
        quota::apportion,
        sampler::sample_pool,
    },
    models::{
        profile::StudentProfile,
        question::{PublicQuestion, Question},
        settings::ExamSettings,
    },
    repository::{ProfileReader, QuestionBank, ResultStore, SettingsStore},
};

/// Share of the base count given to each education bucket.
const EDUCATION_SPLIT: [(Bucket, f64); 2] = [
    (Bucket::GeneralEducation, 0.5),
    (Bucket::ProfessionalEducation, 0.5),
];

/// Rejects multi-bucket profiles that need a major but have none.
fn check_major(profile: &StudentProfile) -> Result<(), EngineError> {
    if profile.uses_buckets() && !profile.is_major_exempt() && profile.major().is_none() {
        return Err(EngineError::Validation(format!(
            "major required for {} profiles outside the {} track",
            profile.target_licensure,
            crate::models::profile::MAJOR_EXEMPT_TRACK
        )));
    }
    Ok(())
}

/// Questions picked so far, in selection order, without repeats.
#[derive(Default)]
struct Selection<'a> {
    questions: Vec<&'a Question>,
    ids: HashSet<i64>,
}

impl<'a> Selection<'a> {
    fn unused(&self, pool: &[&'a Question]) -> Vec<&'a Question> {
        pool.iter()
            .copied()
            .filter(|q| !self.ids.contains(&q.id))
            .collect()
    }

    fn extend(&mut self, picked: Vec<&'a Question>) {
        for q in picked {
            if self.ids.insert(q.id) {
                self.questions.push(q);
            }
        }
    }
}

/// Builds the question set for one attempt from an already fetched bank.
///
/// Single-pool exam types draw the base count from the whole bank.
/// Multi-bucket types split the base count between general and professional
/// education, then draw the extra major count from the profile's major
/// bucket (skipped for the exempt track).
pub fn plan_exam<R: Rng + ?Sized>(
    profile: &StudentProfile,
    bank: &[Question],
    settings: &ExamSettings,
    weights: &DifficultyWeights,
    rng: &mut R,
) -> Result<Vec<Question>, EngineError> {
    check_major(profile)?;

    let mut seen = HashSet::new();
    let bank: Vec<&Question> = bank.iter().filter(|q| seen.insert(q.id)).collect();
    let mut selection = Selection::default();

    if !profile.uses_buckets() {
        let picked = sample_pool(
            &profile.target_licensure,
            &bank,
            settings.base_count(),
            weights,
            rng,
        )?;
        selection.extend(picked);
        return Ok(selection.questions.into_iter().cloned().collect());
    }

    let with_major = !profile.is_major_exempt();
    let mut general: Vec<&Question> = Vec::new();
    let mut professional: Vec<&Question> = Vec::new();
    let mut major_pool: Vec<&Question> = Vec::new();
    for q in &bank {
        match classify(q, profile) {
            Some(Bucket::GeneralEducation) => general.push(*q),
            Some(Bucket::ProfessionalEducation) => professional.push(*q),
            Some(Bucket::Major(_)) if with_major => major_pool.push(*q),
            // Other majors and unclassified questions never enter the exam.
            _ => {}
        }
    }

    for (bucket, count) in apportion(settings.base_count(), &EDUCATION_SPLIT) {
        let source = if bucket == Bucket::GeneralEducation {
            &general
        } else {
            &professional
        };
        let pool = selection.unused(source);
        let picked = sample_pool(bucket.label(), &pool, count, weights, rng)?;
        selection.extend(picked);
    }

    if with_major {
        if let Some(major) = profile.major() {
            let pool = selection.unused(&major_pool);
            let picked = sample_pool(major, &pool, settings.major_count(), weights, rng)?;
            selection.extend(picked);
        }
    }

    Ok(selection.questions.into_iter().cloned().collect())
}

/// Composes a new attempt for `user_id`, returning questions without
/// their answer key.
pub async fn compose_exam<S>(store: &S, user_id: i64) -> Result<Vec<PublicQuestion>, EngineError>
where
    S: QuestionBank + ProfileReader + ResultStore + SettingsStore + ?Sized,
{
    let profile = store
        .get_profile(user_id)
        .await?
        .ok_or_else(|| EngineError::NotFound("profile not found".to_string()))?;
    check_major(&profile)?;

    let exam_type = profile.target_licensure.as_str();
    let subject_filter = (!profile.uses_buckets() && !profile.assigned_review_subjects.is_empty())
        .then_some(profile.assigned_review_subjects.as_slice());

    let bank = store.find_questions(exam_type, subject_filter).await?;
    if bank.is_empty() {
        return Err(EngineError::NotFound(format!(
            "no questions in the bank for {}",
            exam_type
        )));
    }

    let settings = store.get_settings().await?.unwrap_or_default();
    let previous = store.get_latest_result(user_id, exam_type).await?;
    let weights = DifficultyWeights::for_previous(previous.map(|r| r.result.result));

    let mut rng = StdRng::from_entropy();
    let questions = plan_exam(&profile, &bank, &settings, &weights, &mut rng).inspect_err(|e| {
        if let Some(missing) = e.shortfall() {
            tracing::warn!(
                "Cannot compose exam for user {}: {} ({} short)",
                user_id,
                e,
                missing
            );
        }
    })?;

    let mut per_bucket: BTreeMap<String, usize> = BTreeMap::new();
    for q in &questions {
        if let Some(bucket) = classify(q, &profile) {
            *per_bucket.entry(bucket.label().to_string()).or_default() += 1;
        }
    }
    tracing::info!(
        "Composed {} exam for user {}: {} questions {:?} (bank {}, weights {:?})",
        exam_type,
        user_id,
        questions.len(),
        per_bucket,
        bank.len(),
        weights
    );

    Ok(questions.iter().map(PublicQuestion::from).collect())
}
