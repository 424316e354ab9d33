//! Text similarity scoring.
//!
//! Submissions are compared to the target answer with a Dice coefficient over
//! character bigrams and mapped onto a 0-10 scale with one decimal place.

use std::collections::HashMap;

pub const MAX_SCORE: f64 = 10.0;

/// Maximum bonus awarded when every keyword is present
const MAX_KEYWORD_BONUS: f64 = 2.0;

pub const DEFAULT_MIN_ANSWER_LEN: usize = 5;
pub const DEFAULT_MAX_ANSWER_LEN: usize = 5000;

/// Lowercase, trim, and collapse whitespace runs into a single space
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Dice coefficient to the 0-10 scale, rounded as a percentage first
fn dice_to_score(dice: f64) -> f64 {
    (dice * 100.0).round() / 10.0
}

fn bigrams(chars: &[char]) -> impl Iterator<Item = (char, char)> + '_ {
    chars.windows(2).map(|w| (w[0], w[1]))
}

/// Dice coefficient over character bigrams, in `[0, 1]`.
///
/// Whitespace is ignored when building bigrams. Strings shorter than two
/// characters have no bigrams and only match when identical.
pub fn dice_coefficient(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().filter(|c| !c.is_whitespace()).collect();
    let b: Vec<char> = b.chars().filter(|c| !c.is_whitespace()).collect();

    if a == b {
        return 1.0;
    }
    if a.len() < 2 || b.len() < 2 {
        return 0.0;
    }

    let mut remaining: HashMap<(char, char), usize> = HashMap::new();
    for bigram in bigrams(&a) {
        *remaining.entry(bigram).or_insert(0) += 1;
    }

    let mut intersection = 0usize;
    for bigram in bigrams(&b) {
        if let Some(count) = remaining.get_mut(&bigram) {
            if *count > 0 {
                *count -= 1;
                intersection += 1;
            }
        }
    }

    (2.0 * intersection as f64) / ((a.len() - 1) + (b.len() - 1)) as f64
}

/// Similarity of `answer` to `target` on a 0-10 scale, one decimal place
pub fn similarity(answer: &str, target: &str) -> f64 {
    let answer = normalize(answer);
    let target = normalize(target);

    if answer.is_empty() || target.is_empty() {
        return 0.0;
    }

    // Exact match short-circuits the metric
    if answer == target {
        return MAX_SCORE;
    }

    dice_to_score(dice_coefficient(&answer, &target))
}

/// Bonus of up to 2.0 for the share of `keywords` contained in `answer`
pub fn keyword_bonus(answer: &str, keywords: &[String]) -> f64 {
    if keywords.is_empty() {
        return 0.0;
    }

    let answer = normalize(answer);
    let matched = keywords
        .iter()
        .filter(|keyword| answer.contains(&normalize(keyword)))
        .count();

    let rate = matched as f64 / keywords.len() as f64;
    round_one_decimal(rate * MAX_KEYWORD_BONUS)
}

/// Composite score: similarity plus keyword bonus, capped at 10
pub fn score(answer: &str, target: &str, keywords: &[String]) -> f64 {
    let base = similarity(answer, target);
    let bonus = keyword_bonus(answer, keywords);
    round_one_decimal(base + bonus).min(MAX_SCORE)
}

/// Check that the trimmed answer length lies within `[min, max]` characters
pub fn validate_answer_length(answer: &str, min: usize, max: usize) -> bool {
    let len = answer.trim().chars().count();
    len >= min && len <= max
}

/// Encouragement message shown alongside a score
pub fn score_feedback(score: f64) -> &'static str {
    if score >= 9.5 {
        "완벽합니다! 🎉"
    } else if score >= 8.5 {
        "훌륭해요! 🌟"
    } else if score >= 7.0 {
        "잘했어요! 👏"
    } else if score >= 5.0 {
        "좋습니다! 👍"
    } else if score >= 3.0 {
        "아쉬워요 😅"
    } else {
        "다시 시도해보세요 💪"
    }
}
