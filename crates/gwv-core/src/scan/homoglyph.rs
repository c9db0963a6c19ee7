//! Folding of look-alike characters for file name matching.
//!
//! A name is folded with NFKC (fullwidth forms, math alphanumerics, roman
//! numerals) and then reduced to its Unicode confusable skeleton (UTS #39,
//! `confusables.txt`). Only used to decide whether a file *looks* like a
//! wrapper JAR; the real name is always what gets reported.

use unicode_normalization::UnicodeNormalization;
use unicode_security::confusable_detection;

/// Confusable skeleton of `s`. Two strings that render alike share a skeleton.
pub fn skeleton(s: &str) -> String {
    let normalized: String = s.nfkc().collect();
    confusable_detection::skeleton(&normalized).collect()
}

/// True if `a` and `b` are indistinguishable after folding.
pub fn is_confusable(a: &str, b: &str) -> bool {
    a == b || skeleton(a) == skeleton(b)
}
