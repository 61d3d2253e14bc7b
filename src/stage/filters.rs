//! Filter predicates for the number pipelines.
//!
//! The two policies are deliberately asymmetric: zero passes the even
//! pipeline but not the odd one. Negative numbers of either parity never
//! reach a handler and are only observable on the discard channel.

/// Accepts zero and positive numbers (even pipeline).
pub fn non_negative(n: &i64) -> bool {
    *n >= 0
}

/// Accepts strictly positive numbers (odd pipeline).
pub fn positive(n: &i64) -> bool {
    *n > 0
}
