//! Spell checking using Levenshtein distance
//!
//! Used to suggest command names when an undefined control sequence is encountered.

/// Returns the words in the dictionary closest to `word`, closest first.
///
/// Only words within a distance of `max_distance` are returned.
/// Ties are broken alphabetically so that the output is deterministic.
pub fn find_close_words<'a, I>(dictionary: I, word: &str, max_distance: usize) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut matches: Vec<(usize, &'a str)> = dictionary
        .into_iter()
        .map(|candidate| (levenshtein_distance(word, candidate), candidate))
        .filter(|(distance, _)| *distance <= max_distance)
        .collect();
    matches.sort();
    matches.into_iter().map(|(_, candidate)| candidate).collect()
}

/// Edit distance between two strings.
///
/// Only the previous row of the dynamic programming matrix is kept in memory.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];
    for (i, a_i) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, b_j) in b.iter().enumerate() {
            let modify = previous[j] + usize::from(a_i != *b_j);
            let subtract = previous[j + 1] + 1;
            let add = current[j] + 1;
            current[j + 1] = modify.min(subtract).min(add);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}
