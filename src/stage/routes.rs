//! Route functions for [`Router`](super::Router).

/// Route even integers (zero and negatives included) to `even`, odd ones to `odd`.
///
/// Only parity matters; the sign never changes the decision.
pub fn parity(
    even: impl Into<String>,
    odd: impl Into<String>,
) -> impl Fn(&i64) -> String + Send + Sync + 'static {
    let even = even.into();
    let odd = odd.into();
    move |n: &i64| {
        if is_even(*n) {
            even.clone()
        } else {
            odd.clone()
        }
    }
}

/// `n % 2 == 0`, which holds for negative even numbers as well.
pub fn is_even(n: i64) -> bool {
    n % 2 == 0
}
