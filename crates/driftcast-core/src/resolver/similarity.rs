/// Indel similarity of two strings after sorting their whitespace tokens.
///
/// Returns a score in `0.0..=100.0`: `(1 - indel / (len_a + len_b)) * 100`
/// where `indel` counts the insertions and deletions needed to turn one
/// sorted string into the other. Comparison is case-insensitive.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    indel_ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Indel ratio on the raw strings.
pub fn indel_ratio(a: &str, b: &str) -> f64 {
    let a = a.chars().collect::<Vec<_>>();
    let b = b.chars().collect::<Vec<_>>();
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }

    let lcs = longest_common_subsequence(&a, &b);
    let distance = total - 2 * lcs;
    (1.0 - distance as f64 / total as f64) * 100.0
}

fn sorted_tokens(text: &str) -> String {
    let mut tokens = text
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut previous = vec![0_usize; b.len() + 1];
    let mut current = vec![0_usize; b.len() + 1];

    for &left in a {
        for (j, &right) in b.iter().enumerate() {
            current[j + 1] = if left == right {
                previous[j] + 1
            } else {
                current[j].max(previous[j + 1])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < 0.05
    }

    #[test]
    fn identical_strings_score_full_marks() {
        assert!(close(token_sort_ratio("apple", "apple"), 100.0));
        assert!(close(token_sort_ratio("", ""), 100.0));
    }

    #[test]
    fn token_order_and_case_are_ignored() {
        assert!(close(token_sort_ratio("Cola Coca", "coca cola"), 100.0));
    }

    #[test]
    fn typo_scores_match_reference_values() {
        assert!(close(token_sort_ratio("appel", "apple"), 80.0));
        assert!(close(token_sort_ratio("apppple", "apple"), 83.33));
        assert!(close(token_sort_ratio("amzon", "amazon"), 90.91));
        assert!(close(token_sort_ratio("microsft", "microsoft"), 94.12));
    }

    #[test]
    fn disjoint_strings_score_zero() {
        assert!(close(indel_ratio("abc", "xyz"), 0.0));
    }
}
