//! Uniform choice with an explicit "nothing to choose" outcome.

use rand::Rng;

/// Pick one element of `choices` uniformly by position.
///
/// - empty input: `None`
/// - one element: that element, without touching `rng`
/// - otherwise: each position is equally likely, regardless of the values stored
pub fn sample_one<T: Copy, R: Rng>(choices: &[T], rng: &mut R) -> Option<T> {
    match choices {
        [] => None,
        [only] => Some(*only),
        _ => Some(choices[rng.random_range(0..choices.len())]),
    }
}
