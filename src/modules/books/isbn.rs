//! ISBN-like identifiers: `978-` then nine random digits, `-` and a checksum.
//!
//! The checksum is the weighted digit sum modulo 11 and is printed in
//! decimal, so it may be `10`. Uniqueness is not checked.

use rand::Rng;

pub const PREFIX: &str = "978";
pub const DIGITS: usize = 9;

/// Draw nine uniform digits from `rng` and format them.
pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut digits = [0u8; DIGITS];
    for digit in digits.iter_mut() {
        *digit = rng.gen_range(0..10);
    }
    format_isbn(&digits)
}

/// `sum((i + 1) * d_i) mod 11`, with `i` counted from zero.
pub fn checksum(digits: &[u8; DIGITS]) -> u32 {
    digits
        .iter()
        .enumerate()
        .map(|(i, &d)| (i as u32 + 1) * u32::from(d))
        .sum::<u32>()
        % 11
}

pub fn format_isbn(digits: &[u8; DIGITS]) -> String {
    let body: String = digits.iter().map(|d| char::from(b'0' + d)).collect();
    format!("{PREFIX}-{body}-{}", checksum(digits))
}
