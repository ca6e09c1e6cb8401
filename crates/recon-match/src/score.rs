//! Similarity ratios on a 0 to 100 scale.
//!
//! `ratio` is the rounded normalized Indel similarity of two whole strings.
//! `partial_ratio` slides the shorter string over the longer one and keeps
//! the best window, so `first` scores 100 against `first name`.
//!
//! Both are plain functions of their inputs. Callers lower-case before
//! comparing.

use rapidfuzz::fuzz;

/// Full-string ratio a Strict match must exceed.
pub const STRICT_RATIO_THRESHOLD: u8 = 90;
/// Full-string ratio a Lenient partial match must exceed.
pub const LENIENT_RATIO_THRESHOLD: u8 = 60;
/// Partial ratio a Lenient partial match must exceed.
pub const LENIENT_PARTIAL_THRESHOLD: u8 = 90;

/// Symmetric full-string similarity, 0 to 100.
///
/// Empty input scores 0.
pub fn ratio(a: &str, b: &str) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    to_percent(fuzz::ratio(a.chars(), b.chars()))
}

/// Best similarity of the shorter string against every equally long window
/// of the longer string, 0 to 100.
///
/// Empty input scores 0.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (shorter, longer) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if shorter.is_empty() {
        return 0;
    }

    let mut best = 0;
    for window in longer.windows(shorter.len()) {
        let score = to_percent(fuzz::ratio(
            shorter.iter().copied(),
            window.iter().copied(),
        ));
        if score > best {
            best = score;
            if best == 100 {
                break;
            }
        }
    }
    best
}

fn to_percent(similarity: f64) -> u8 {
    (similarity.clamp(0.0, 1.0) * 100.0).round() as u8
}
