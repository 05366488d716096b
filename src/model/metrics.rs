use crate::model::constants::PROB_EPSILON;

/// Held-out predictions and realized outcomes from one or more evaluate
/// passes. Probabilities and outcomes are kept aligned by index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalibrationSamples {
    pub probabilities: Vec<f64>,
    pub outcomes: Vec<f64>
}

impl CalibrationSamples {
    pub fn new() -> CalibrationSamples {
        CalibrationSamples::default()
    }

    pub fn push(&mut self, probability: f64, outcome: f64) {
        self.probabilities.push(probability);
        self.outcomes.push(outcome);
    }

    pub fn extend(&mut self, other: &CalibrationSamples) {
        self.probabilities.extend_from_slice(&other.probabilities);
        self.outcomes.extend_from_slice(&other.outcomes);
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Mean squared error between probability and outcome. Quadratic, so
    /// it naturally supports draws (outcome 0.5). None when empty.
    pub fn brier_score(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }

        let sum: f64 = self
            .probabilities
            .iter()
            .zip(&self.outcomes)
            .map(|(p, y)| (p - y).powi(2))
            .sum();
        Some(sum / self.len() as f64)
    }

    /// Cross-entropy over decisive rows only (draws carry no label for a
    /// binary loss). None when no decisive rows exist.
    pub fn log_loss(&self) -> Option<f64> {
        let mut sum = 0.0;
        let mut n = 0usize;
        for (p, y) in self.decisive() {
            let p = p.clamp(PROB_EPSILON, 1.0 - PROB_EPSILON);
            sum -= y * p.ln() + (1.0 - y) * (1.0 - p).ln();
            n += 1;
        }

        match n {
            0 => None,
            _ => Some(sum / n as f64)
        }
    }

    /// Fraction of decisive rows where `probability > 0.5` agrees with the
    /// realized winner. None when no decisive rows exist.
    pub fn accuracy(&self) -> Option<f64> {
        let mut correct = 0usize;
        let mut n = 0usize;
        for (p, y) in self.decisive() {
            let predicted_a = p > 0.5;
            let actual_a = y == 1.0;
            if predicted_a == actual_a {
                correct += 1;
            }
            n += 1;
        }

        match n {
            0 => None,
            _ => Some(correct as f64 / n as f64)
        }
    }

    fn decisive(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.probabilities
            .iter()
            .zip(&self.outcomes)
            .filter(|(_, y)| **y != 0.5)
            .map(|(p, y)| (*p, *y))
    }
}

#[cfg(test)]
mod tests {
    use crate::model::metrics::CalibrationSamples;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_empty_samples_have_no_metrics() {
        let samples = CalibrationSamples::new();

        assert!(samples.is_empty());
        assert_eq!(samples.brier_score(), None);
        assert_eq!(samples.log_loss(), None);
        assert_eq!(samples.accuracy(), None);
    }

    #[test]
    fn test_brier_score() {
        let mut samples = CalibrationSamples::new();
        samples.push(0.8, 1.0);
        samples.push(0.3, 0.0);
        samples.push(0.5, 0.5);

        // ((0.2)^2 + (0.3)^2 + 0) / 3
        assert_abs_diff_eq!(samples.brier_score().unwrap(), 0.13 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_log_loss_ignores_draws() {
        let mut samples = CalibrationSamples::new();
        samples.push(0.8, 1.0);
        samples.push(0.2, 0.0);
        samples.push(0.9, 0.5); // draw, excluded

        let expected = -(0.8f64.ln() + 0.8f64.ln()) / 2.0;
        assert_abs_diff_eq!(samples.log_loss().unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_log_loss_all_draws_is_none() {
        let mut samples = CalibrationSamples::new();
        samples.push(0.5, 0.5);
        samples.push(0.7, 0.5);

        assert_eq!(samples.log_loss(), None);
        // Brier still defined over draws
        assert!(samples.brier_score().is_some());
    }

    #[test]
    fn test_log_loss_clamps_extreme_probabilities() {
        let mut samples = CalibrationSamples::new();
        samples.push(0.0, 1.0);

        let loss = samples.log_loss().unwrap();
        assert!(loss.is_finite());
        assert!(loss > 30.0);
    }

    #[test]
    fn test_accuracy() {
        let mut samples = CalibrationSamples::new();
        samples.push(0.8, 1.0); // correct
        samples.push(0.4, 1.0); // wrong
        samples.push(0.3, 0.0); // correct
        samples.push(0.6, 0.5); // draw, excluded

        assert_abs_diff_eq!(samples.accuracy().unwrap(), 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_extend_appends_aligned() {
        let mut a = CalibrationSamples::new();
        a.push(0.8, 1.0);
        let mut b = CalibrationSamples::new();
        b.push(0.3, 0.0);
        b.push(0.5, 0.5);

        a.extend(&b);

        assert_eq!(a.len(), 3);
        assert_eq!(a.probabilities, vec![0.8, 0.3, 0.5]);
        assert_eq!(a.outcomes, vec![1.0, 0.0, 0.5]);
    }
}
