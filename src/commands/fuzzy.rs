//! Edit-distance matching for "did you mean" suggestions.

/// Default maximum distance for [`find_closest_match`].
pub const DEFAULT_THRESHOLD: usize = 3;

/// Maximum distance for an option to appear in [`get_suggestions`].
const SUGGESTION_DISTANCE: usize = 2;

/// Maximum number of entries returned by [`get_suggestions`].
const MAX_SUGGESTIONS: usize = 3;

/// Computes the Levenshtein distance between two strings, ignoring case.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Returns the option closest to `input` if its distance is within `threshold`.
///
/// Ties keep the option that appears first in `options`.
pub fn find_closest_match<'a, S: AsRef<str>>(
    input: &str,
    options: &'a [S],
    threshold: usize,
) -> Option<&'a str> {
    let mut best: Option<(&str, usize)> = None;

    for option in options {
        let option = option.as_ref();
        let distance = levenshtein_distance(input, option);
        if distance > threshold {
            continue;
        }
        match best {
            Some((_, best_distance)) if best_distance <= distance => {}
            _ => best = Some((option, distance)),
        }
    }

    best.map(|(option, _)| option)
}

/// Returns up to three options within distance 2 of `input`, closest first.
pub fn get_suggestions<S: AsRef<str>>(input: &str, options: &[S]) -> Vec<String> {
    let mut scored: Vec<(usize, &str)> = options
        .iter()
        .map(|o| (levenshtein_distance(input, o.as_ref()), o.as_ref()))
        .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
        .collect();

    // sort_by_key is stable, so equal distances keep input order
    scored.sort_by_key(|(distance, _)| *distance);

    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, option)| option.to_string())
        .collect()
}
