use std::ops::RangeInclusive;

use rand::Rng;

use super::SequenceCounter;

/// Yields `1, 2, 3, ...` from a shared counter.
pub fn positive_sequence(counter: SequenceCounter) -> impl FnMut() -> i64 + Send + 'static {
    move || counter.next()
}

/// Yields uniformly distributed negative numbers whose magnitude lies in
/// `magnitudes`. Magnitudes below one are raised to one.
pub fn negative_random(magnitudes: RangeInclusive<i64>) -> impl FnMut() -> i64 + Send + 'static {
    let low = (*magnitudes.start()).max(1);
    let high = (*magnitudes.end()).max(low);
    move || -rand::rng().random_range(low..=high)
}
