/// Per-player simulation state within one skillset pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub rating: f64,
    /// Highest rating ever attained during the pass.
    pub peak: f64,
    /// Total rows this player has appeared in, on either side, including
    /// evaluate-mode test rows. Drives the holdout eligibility gate.
    pub matches_seen: u32
}

impl PlayerState {
    pub fn new(rating_init: f64) -> PlayerState {
        PlayerState {
            rating: rating_init,
            peak: rating_init,
            matches_seen: 0
        }
    }
}
