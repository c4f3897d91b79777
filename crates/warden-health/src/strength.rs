//! Password strength scoring.

use std::collections::HashSet;

use crate::error::ScoreError;

/// Scores a password on a 0..=100 scale.
pub trait PasswordStrengthScorer: Send + Sync {
    /// Score `password`; absent passwords score 0.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError`] when the scorer cannot evaluate the input.
    fn score(&self, password: Option<&str>) -> Result<u8, ScoreError>;
}

/// Heuristic scorer rewarding character variety and penalising predictable runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharacterClassScorer;

impl PasswordStrengthScorer for CharacterClassScorer {
    fn score(&self, password: Option<&str>) -> Result<u8, ScoreError> {
        let Some(password) = password.filter(|value| !value.is_empty()) else {
            return Ok(0);
        };
        Ok(clamp(judge(password)))
    }
}

fn judge(password: &str) -> i64 {
    let chars = password.chars().collect::<Vec<_>>();
    let unique = chars.iter().collect::<HashSet<_>>().len();
    let digits = chars.iter().filter(|c| c.is_ascii_digit()).count();
    let specials = chars.iter().filter(|c| !c.is_alphanumeric()).count();
    let has_upper = chars.iter().any(|c| c.is_uppercase());
    let has_lower = chars.iter().any(|c| c.is_lowercase());

    let mut score = 0_i64;
    score += 10 * i64::from(unique > 7) + 10 * i64::from(unique > 14);
    score += 8 * (i64::from(digits > 0) + i64::from(digits > 2) + i64::from(digits > 3));
    score += 10 * (i64::from(specials > 0) + i64::from(specials > 1) + i64::from(specials > 2));
    score += 10 * i64::from(has_upper && has_lower);
    score += 4 * i64::try_from(chars.len().min(10)).unwrap_or(10);

    score -= 5 * count_sequential_digits(&chars);
    score -= 5 * count_repeats(&chars);
    score
}

/// Adjacent digit pairs that step by exactly one, e.g. `12` or `98`.
fn count_sequential_digits(chars: &[char]) -> i64 {
    let hits = chars
        .windows(2)
        .filter(|pair| match (pair[0].to_digit(10), pair[1].to_digit(10)) {
            (Some(a), Some(b)) => a.abs_diff(b) == 1,
            _ => false,
        })
        .count();
    i64::try_from(hits).unwrap_or(i64::MAX / 10)
}

/// Characters that repeat their predecessor.
fn count_repeats(chars: &[char]) -> i64 {
    let hits = chars.windows(2).filter(|pair| pair[0] == pair[1]).count();
    i64::try_from(hits).unwrap_or(i64::MAX / 10)
}

fn clamp(raw: i64) -> u8 {
    u8::try_from(raw.clamp(0, 100)).unwrap_or(100)
}
