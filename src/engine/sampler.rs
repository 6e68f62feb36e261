// src/engine/sampler.rs

use rand::{Rng, seq::SliceRandom};

use crate::{
    engine::{difficulty::DifficultyWeights, error::EngineError, quota::apportion},
    models::question::Question,
};

/// Draws exactly `target` questions from `pool` without replacement.
///
/// Each difficulty level gets its share of `target` from the quota planner.
/// A level with fewer questions than its share contributes all it has, and
/// the gap is then filled uniformly from whatever is left in the pool, of any
/// difficulty. Fails only when the pool as a whole is smaller than `target`.
///
/// `pool` must not contain the same question twice.
pub fn sample_pool<'a, R: Rng + ?Sized>(
    bucket: &str,
    pool: &[&'a Question],
    target: usize,
    weights: &DifficultyWeights,
    rng: &mut R,
) -> Result<Vec<&'a Question>, EngineError> {
    if target == 0 {
        return Ok(Vec::new());
    }

    let mut taken = vec![false; pool.len()];
    let mut picked: Vec<usize> = Vec::with_capacity(target);

    for (difficulty, quota) in apportion(target, &weights.entries()) {
        let level: Vec<usize> = (0..pool.len())
            .filter(|&i| pool[i].difficulty == difficulty)
            .collect();
        if level.len() < quota {
            tracing::debug!(
                "{}: only {} {} questions for a quota of {}",
                bucket,
                level.len(),
                difficulty,
                quota
            );
        }
        for &i in level.choose_multiple(rng, quota) {
            taken[i] = true;
            picked.push(i);
        }
    }

    let shortfall = target - picked.len();
    if shortfall > 0 {
        let rest: Vec<usize> = (0..pool.len()).filter(|&i| !taken[i]).collect();
        if rest.len() < shortfall {
            return Err(EngineError::InsufficientPool {
                bucket: bucket.to_string(),
                needed: target,
                available: pool.len(),
            });
        }
        picked.extend(rest.choose_multiple(rng, shortfall).copied());
    }

    Ok(picked.into_iter().map(|i| pool[i]).collect())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::models::question::{Choice, Difficulty};

    fn bank(easy: usize, medium: usize, hard: usize) -> Vec<Question> {
        let levels = [
            (Difficulty::Easy, easy),
            (Difficulty::Medium, medium),
            (Difficulty::Hard, hard),
        ];
        let mut id = 0;
        let mut out = Vec::new();
        for (difficulty, n) in levels {
            for _ in 0..n {
                id += 1;
                out.push(Question {
                    id,
                    exam_type: "CPA".to_string(),
                    subject: "FAR".to_string(),
                    topic: "Leases".to_string(),
                    difficulty,
                    question: format!("Q{}", id),
                    a: "a".to_string(),
                    b: "b".to_string(),
                    c: "c".to_string(),
                    d: "d".to_string(),
                    answer: Choice::C,
                });
            }
        }
        out
    }

    fn count(picked: &[&Question], difficulty: Difficulty) -> usize {
        picked.iter().filter(|q| q.difficulty == difficulty).count()
    }

    #[test]
    fn test_quota_is_met_per_difficulty() {
        let questions = bank(10, 10, 10);
        let pool: Vec<&Question> = questions.iter().collect();
        let mut rng = StdRng::seed_from_u64(1);

        let picked = sample_pool("FAR", &pool, 10, &DifficultyWeights::DEFAULT, &mut rng).unwrap();

        assert_eq!(picked.len(), 10);
        assert_eq!(count(&picked, Difficulty::Easy), 4);
        assert_eq!(count(&picked, Difficulty::Medium), 4);
        assert_eq!(count(&picked, Difficulty::Hard), 2);
    }

    #[test]
    fn test_short_level_is_backfilled() {
        let questions = bank(3, 10, 10);
        let pool: Vec<&Question> = questions.iter().collect();

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked =
                sample_pool("FAR", &pool, 10, &DifficultyWeights::DEFAULT, &mut rng).unwrap();

            assert_eq!(picked.len(), 10);
            assert_eq!(count(&picked, Difficulty::Easy), 3);
            // The missing Easy slot came from Medium or Hard.
            assert_eq!(count(&picked, Difficulty::Medium) + count(&picked, Difficulty::Hard), 7);
            assert!(count(&picked, Difficulty::Medium) >= 4);
            assert!(count(&picked, Difficulty::Hard) >= 2);

            let ids: HashSet<i64> = picked.iter().map(|q| q.id).collect();
            assert_eq!(ids.len(), 10);
        }
    }

    #[test]
    fn test_whole_pool_when_target_equals_size() {
        let questions = bank(1, 0, 4);
        let pool: Vec<&Question> = questions.iter().collect();
        let mut rng = StdRng::seed_from_u64(3);

        let picked = sample_pool("FAR", &pool, 5, &DifficultyWeights::DEFAULT, &mut rng).unwrap();

        let mut ids: Vec<i64> = picked.iter().map(|q| q.id).collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_insufficient_pool_reports_counts() {
        let questions = bank(2, 2, 2);
        let pool: Vec<&Question> = questions.iter().collect();
        let mut rng = StdRng::seed_from_u64(4);

        let err = sample_pool("Auditing", &pool, 8, &DifficultyWeights::DEFAULT, &mut rng)
            .unwrap_err();

        match &err {
            EngineError::InsufficientPool {
                bucket,
                needed,
                available,
            } => {
                assert_eq!(bucket, "Auditing");
                assert_eq!(*needed, 8);
                assert_eq!(*available, 6);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(err.shortfall(), Some(2));
    }

    #[test]
    fn test_zero_target() {
        let mut rng = StdRng::seed_from_u64(5);
        let picked = sample_pool("x", &[], 0, &DifficultyWeights::DEFAULT, &mut rng).unwrap();
        assert!(picked.is_empty());
    }
}
