//! Typo suggestions for task names.

/// Maximum number of suggestions offered for an unknown task
pub const MAX_SUGGESTIONS: usize = 3;

/// Minimum similarity for a name to be suggested
pub const SIMILARITY_CUTOFF: f64 = 0.6;

/// Levenshtein distance over chars
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Similarity in `0.0..=1.0`: one minus the edit distance over the longer length
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - edit_distance(a, b) as f64 / longest as f64
}

/// Up to `limit` candidates scoring at least `cutoff`, best first
///
/// Ties are broken alphabetically so output is stable.
pub fn close_matches<'a, I>(query: &str, candidates: I, limit: usize, cutoff: f64) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut scored: Vec<(f64, &str)> = candidates
        .into_iter()
        .filter(|candidate| *candidate != query)
        .map(|candidate| (similarity(query, candidate), candidate))
        .filter(|(score, _)| *score >= cutoff)
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, name)| name.to_string())
        .collect()
}

/// Suggestions for an unknown task name using the default limit and cutoff
pub fn suggest_tasks(query: &str, known: &[String]) -> Vec<String> {
    close_matches(
        query,
        known.iter().map(String::as_str),
        MAX_SUGGESTIONS,
        SIMILARITY_CUTOFF,
    )
}
