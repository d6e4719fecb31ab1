//! Prime sizing for the slot array.
//!
//! Quadratic probing only covers half of the slots before repeating an
//! offset when the table length is prime, so every length the table ever
//! takes passes through `next_prime`.

/// Largest prime not exceeding the largest index a slot array may have.
#[cfg(target_pointer_width = "64")]
pub const MAX_TABLE_SIZE: usize = 9_223_372_036_854_775_783; // 2^63 - 25
#[cfg(target_pointer_width = "32")]
pub const MAX_TABLE_SIZE: usize = 2_147_483_647; // 2^31 - 1
#[cfg(target_pointer_width = "16")]
pub const MAX_TABLE_SIZE: usize = 32_749; // 2^15 - 19

/// Trial division up to `⌊√n⌋`.
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3;
    // `d <= n / d` instead of `d * d <= n` to stay clear of overflow.
    while d <= n / d {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Smallest prime `>= n`.
///
/// Even inputs start the search at `n + 1`; candidates then advance by two.
/// Callers keep `n <= MAX_TABLE_SIZE`, which bounds the result by the same
/// prime.
pub fn next_prime(n: usize) -> usize {
    if n <= 2 {
        return 2;
    }
    let mut candidate = if n % 2 == 0 { n + 1 } else { n };
    while !is_prime(candidate) {
        candidate += 2;
    }
    candidate
}
