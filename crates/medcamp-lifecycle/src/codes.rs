//! Generated identifiers for camps and test entries.

use jiff::Timestamp;
use jiff::civil::Date;
use rand::Rng;

use medcamp_core::catalog;

pub const CAMP_CODE_PREFIX: &str = "MSHC";

/// `MSHC<yyyymmdd><4 random digits>`.
pub fn camp_code<R: Rng + ?Sized>(date: Date, rng: &mut R) -> String {
    format!(
        "{CAMP_CODE_PREFIX}{:04}{:02}{:02}{:04}",
        date.year(),
        date.month(),
        date.day(),
        rng.gen_range(0..10_000)
    )
}

/// `<catalog prefix>-<epoch millis, base 36>-<3 random base-36 chars>`, upper-cased.
pub fn test_code<R: Rng + ?Sized>(test_name: &str, now: Timestamp, rng: &mut R) -> String {
    let millis = u64::try_from(now.as_millisecond()).unwrap_or_default();
    let suffix: String = (0..3)
        .map(|_| base36_digit(rng.gen_range(0..36)))
        .collect();
    format!("{}-{}-{suffix}", catalog::code_prefix(test_name), to_base36(millis)).to_uppercase()
}

pub fn booking_id(test_code: &str) -> String {
    format!("BK-{test_code}")
}

pub fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(base36_digit((n % 36) as u32));
        n /= 36;
    }
    digits.iter().rev().collect()
}

fn base36_digit(d: u32) -> char {
    char::from_digit(d, 36).unwrap_or('0')
}
