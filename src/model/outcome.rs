use crate::model::constants::{RATE_LOG_SCALE, TOLERANCE, WIFE_DIFF_SCALE};

/// How a match between two scores resolves into a result for side A.
///
/// Both policies map `(rate_a, rate_b, wife_a, wife_b)` to a value in
/// `[0, 1]`: 1 means A wins, 0 means B wins, 0.5 is a draw. The policy is
/// a simulation-time configuration choice; the engine never inspects the
/// variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutcomePolicy {
    /// Compares rates first, then wife%, each within an absolute
    /// tolerance band. A strict total order with explicit ties, suited to
    /// the exact-value collisions common in score data.
    Ranked { tolerance: f64 },
    /// `sigmoid(rate_scale * ln(rate_a / rate_b) + wife_scale * (wife_a - wife_b))`.
    /// Requires positive rates, which the store adapter guarantees.
    Logistic { rate_scale: f64, wife_scale: f64 }
}

impl Default for OutcomePolicy {
    fn default() -> Self {
        OutcomePolicy::Ranked { tolerance: TOLERANCE }
    }
}

impl OutcomePolicy {
    pub fn logistic_default() -> OutcomePolicy {
        OutcomePolicy::Logistic {
            rate_scale: RATE_LOG_SCALE,
            wife_scale: WIFE_DIFF_SCALE
        }
    }

    /// Result for side A.
    pub fn outcome(&self, rate_a: f64, rate_b: f64, wife_a: f64, wife_b: f64) -> f64 {
        match *self {
            OutcomePolicy::Ranked { tolerance } => ranked_outcome(rate_a, rate_b, wife_a, wife_b, tolerance),
            OutcomePolicy::Logistic { rate_scale, wife_scale } => {
                logistic_outcome(rate_a, rate_b, wife_a, wife_b, rate_scale, wife_scale)
            }
        }
    }
}

fn ranked_outcome(rate_a: f64, rate_b: f64, wife_a: f64, wife_b: f64, tolerance: f64) -> f64 {
    if rate_a > rate_b + tolerance {
        return 1.0;
    }
    if rate_b > rate_a + tolerance {
        return 0.0;
    }
    // Rates effectively equal, defer to accuracy
    if wife_a > wife_b + tolerance {
        return 1.0;
    }
    if wife_b > wife_a + tolerance {
        return 0.0;
    }
    0.5
}

fn logistic_outcome(rate_a: f64, rate_b: f64, wife_a: f64, wife_b: f64, rate_scale: f64, wife_scale: f64) -> f64 {
    let z = rate_scale * (rate_a / rate_b).ln() + wife_scale * (wife_a - wife_b);
    1.0 / (1.0 + (-z).exp())
}

#[cfg(test)]
mod tests {
    use crate::model::outcome::OutcomePolicy;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_ranked_rate_wins_outright() {
        let policy = OutcomePolicy::Ranked { tolerance: 1e-3 };

        // Strictly greater rate wins regardless of wife%
        assert_eq!(policy.outcome(1.2, 1.1, 90.0, 99.0), 1.0);
        assert_eq!(policy.outcome(1.1, 1.2, 99.0, 90.0), 0.0);
    }

    #[test]
    fn test_ranked_equal_rate_defers_to_wife() {
        let policy = OutcomePolicy::Ranked { tolerance: 1e-3 };

        assert_eq!(policy.outcome(1.2, 1.2, 97.5, 97.0), 1.0);
        assert_eq!(policy.outcome(1.2, 1.2, 97.0, 97.5), 0.0);
    }

    #[test]
    fn test_ranked_draw_within_tolerance() {
        let policy = OutcomePolicy::Ranked { tolerance: 1e-3 };

        assert_eq!(policy.outcome(1.2, 1.2, 97.0, 97.0), 0.5);
        // Differences inside the tolerance band are ties
        assert_eq!(policy.outcome(1.2, 1.2 + 5e-4, 97.0, 97.0 - 5e-4), 0.5);
    }

    #[test]
    fn test_ranked_flip_is_discrete() {
        let policy = OutcomePolicy::Ranked { tolerance: 1e-3 };

        // Crossing the tolerance band flips straight from 0.5 to 1.0,
        // with no intermediate value
        assert_eq!(policy.outcome(1.2, 1.2, 97.0, 97.0), 0.5);
        assert_eq!(policy.outcome(1.2 + 2e-3, 1.2, 97.0, 97.0), 1.0);
    }

    #[test]
    fn test_logistic_equal_inputs_are_a_draw() {
        let policy = OutcomePolicy::logistic_default();

        assert_abs_diff_eq!(policy.outcome(1.3, 1.3, 97.0, 97.0), 0.5);
    }

    #[test]
    fn test_logistic_symmetry() {
        let policy = OutcomePolicy::logistic_default();

        let cases = [
            (1.0, 1.4, 96.5, 98.0),
            (1.5, 0.9, 99.0, 96.1),
            (1.1, 1.1, 97.2, 96.8),
            (0.7, 2.0, 96.0, 99.6),
        ];
        for (rate_a, rate_b, wife_a, wife_b) in cases {
            let forward = policy.outcome(rate_a, rate_b, wife_a, wife_b);
            let reverse = policy.outcome(rate_b, rate_a, wife_b, wife_a);
            assert_abs_diff_eq!(forward, 1.0 - reverse, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_logistic_higher_rate_favored() {
        let policy = OutcomePolicy::logistic_default();

        assert!(policy.outcome(1.4, 1.0, 97.0, 97.0) > 0.5);
        assert!(policy.outcome(1.0, 1.4, 97.0, 97.0) < 0.5);
    }
}
