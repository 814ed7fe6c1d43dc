use std::collections::HashMap;

/// Correspondence between the primitives of two visuals.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PartMatching {
    /// `(source index, target index)` pairs that move into each other.
    pub pairs: Vec<(usize, usize)>,
    /// Source primitives with no counterpart.
    pub fade_out: Vec<usize>,
    /// Target primitives with no counterpart.
    pub fade_in: Vec<usize>,
}

/// Pair the k-th occurrence of each key in `from` with the k-th occurrence of the same key in
/// `to`.
///
/// Keys are compared verbatim, so keys that differ only by whitespace padding never pair up.
pub fn match_parts<A, B>(from: &[A], to: &[B]) -> PartMatching
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let mut targets: HashMap<&str, Vec<usize>> = HashMap::new();
    for (j, key) in to.iter().enumerate() {
        targets.entry(key.as_ref()).or_default().push(j);
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut out = PartMatching::default();
    let mut claimed = vec![false; to.len()];
    for (i, key) in from.iter().enumerate() {
        let key = key.as_ref();
        let nth = seen.entry(key).or_insert(0);
        match targets.get(key).and_then(|js| js.get(*nth)) {
            Some(&j) => {
                out.pairs.push((i, j));
                claimed[j] = true;
            }
            None => out.fade_out.push(i),
        }
        *nth += 1;
    }
    out.fade_in = claimed
        .iter()
        .enumerate()
        .filter(|(_, c)| !**c)
        .map(|(j, _)| j)
        .collect();
    out
}

#[cfg(test)]
#[path = "../../tests/unit/choreo/matching.rs"]
mod tests;
