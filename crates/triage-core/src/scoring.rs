use serde::Serialize;

/// Reward for a submitted diagnosis. Pure function of the diagnosis pair and
/// the number of tool calls spent; computed exactly once per session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Score {
    pub correct: bool,
    pub primary_reward: f64,
    pub efficiency_reward: f64,
    pub total_reward: f64,
}

/// Correctness is case-insensitive exact equality; no fuzzy matching, no
/// partial credit for synonyms.
///
/// The efficiency term pays 1.0 at one call and loses 0.15 per additional
/// call, clamped below at zero. There is deliberately no upper clamp: a
/// correct diagnosis with zero tool calls scores 1.15.
pub fn score_diagnosis(
    agent_diagnosis: &str,
    correct_diagnosis: &str,
    tool_calls_made: u32,
) -> Score {
    let correct = agent_diagnosis.to_lowercase() == correct_diagnosis.to_lowercase();
    let primary_reward = if correct { 2.0 } else { 0.0 };
    let efficiency_reward = if correct {
        (1.0 - 0.15 * (f64::from(tool_calls_made) - 1.0)).max(0.0)
    } else {
        0.0
    };
    Score {
        correct,
        primary_reward,
        efficiency_reward,
        total_reward: primary_reward + efficiency_reward,
    }
}

#[cfg(test)]
mod tests {
    use super::score_diagnosis;

    const CORRECT: &str = "database connection pool exhausted";

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn contract_one_call_full_efficiency() {
        let score = score_diagnosis(CORRECT, CORRECT, 1);
        assert!(score.correct);
        assert_close(score.primary_reward, 2.0);
        assert_close(score.efficiency_reward, 1.0);
        assert_close(score.total_reward, 3.0);
    }

    #[test]
    fn contract_five_calls_decay() {
        let score = score_diagnosis(CORRECT, CORRECT, 5);
        assert_close(score.efficiency_reward, 0.4);
        assert_close(score.total_reward, 2.4);
    }

    #[test]
    fn contract_decay_clamps_at_zero() {
        assert_close(score_diagnosis(CORRECT, CORRECT, 8).efficiency_reward, 0.0);
        assert_close(score_diagnosis(CORRECT, CORRECT, 9).efficiency_reward, 0.0);
        assert_close(score_diagnosis(CORRECT, CORRECT, 10).efficiency_reward, 0.0);
    }

    #[test]
    fn contract_zero_calls_pays_above_one() {
        let score = score_diagnosis(CORRECT, CORRECT, 0);
        assert_close(score.efficiency_reward, 1.15);
        assert_close(score.total_reward, 3.15);
    }

    #[test]
    fn comparison_ignores_case_only() {
        assert!(score_diagnosis("Database Connection Pool Exhausted", CORRECT, 1).correct);
        assert!(!score_diagnosis("database connection pool", CORRECT, 1).correct);
        assert!(!score_diagnosis("", CORRECT, 1).correct);
    }

    #[test]
    fn incorrect_diagnosis_earns_nothing_regardless_of_calls() {
        let score = score_diagnosis("memory leak in web service", CORRECT, 0);
        assert!(!score.correct);
        assert_close(score.primary_reward, 0.0);
        assert_close(score.efficiency_reward, 0.0);
        assert_close(score.total_reward, 0.0);
    }
}
