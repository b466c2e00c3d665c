//! Greedy action selection over q-values
//!
//! Deployment-time selection is pure exploitation: the action with the
//! highest score wins, with no sampling and no exploration noise.

/// Index of the first maximal score
///
/// Ties resolve to the lowest index, so repeated calls on equal input always
/// pick the same action.
///
/// # Panics
///
/// Panics if `scores` is empty. The action space is fixed at construction
/// and always has at least one entry.
///
/// # Example
///
/// ```rust
/// use ml_platformer::rl::select_greedy;
///
/// assert_eq!(select_greedy(&[0.1, 0.9, 0.3]), 1);
/// assert_eq!(select_greedy(&[0.5, 0.5, 0.5]), 0);
/// ```
pub fn select_greedy(scores: &[f32]) -> usize {
    assert!(!scores.is_empty(), "cannot select from an empty score vector");

    let mut best = 0;
    for (index, &score) in scores.iter().enumerate().skip(1) {
        // Strict comparison keeps the earliest maximum on ties
        if score > scores[best] {
            best = index;
        }
    }
    best
}
