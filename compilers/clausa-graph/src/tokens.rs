//! Set operations over ascending token-id sequences.

use std::cmp::Ordering;

use clausa_protocol::TokenId;

/// Tokens of `a` that are not in `b`, in `a`'s order. Both inputs must be ascending.
pub fn subtract(a: &[TokenId], b: &[TokenId]) -> Vec<TokenId> {
    let mut out = Vec::with_capacity(a.len());
    let mut j = 0;

    for &token in a {
        while j < b.len() && b[j] < token {
            j += 1;
        }
        if j < b.len() && b[j] == token {
            continue;
        }
        out.push(token);
    }

    out
}

/// Ascending, de-duplicated merge of two ascending sequences.
pub fn union(a: &[TokenId], b: &[TokenId]) -> Vec<TokenId> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => {
                out.push(a[i]);
                i += 1;
            }
            Ordering::Greater => {
                out.push(b[j]);
                j += 1;
            }
            Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out.dedup();
    out
}

/// Whether two ascending sequences share no token.
pub fn is_disjoint(a: &[TokenId], b: &[TokenId]) -> bool {
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => return false,
        }
    }
    true
}

/// Sort and de-duplicate in place.
pub fn normalize(tokens: &mut Vec<TokenId>) {
    tokens.sort_unstable();
    tokens.dedup();
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ids(raw: &[u32]) -> Vec<TokenId> {
        raw.iter().copied().map(TokenId).collect()
    }

    #[test]
    fn test_subtract_keeps_order() {
        let sentence = ids(&[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        let clause = ids(&[3, 4, 5, 6, 7, 8]);
        assert_eq!(subtract(&sentence, &clause), ids(&[1, 2, 9]));
    }

    #[test]
    fn test_subtract_edges() {
        assert!(subtract(&[], &ids(&[1])).is_empty());
        assert_eq!(subtract(&ids(&[1, 2]), &[]), ids(&[1, 2]));
        // Tokens of b that are not in a are ignored
        assert_eq!(subtract(&ids(&[2, 4, 6]), &ids(&[1, 3, 4, 7])), ids(&[2, 6]));
    }

    #[test]
    fn test_union_and_disjoint() {
        assert_eq!(union(&ids(&[1, 3, 5]), &ids(&[2, 3, 6])), ids(&[1, 2, 3, 5, 6]));
        assert!(is_disjoint(&ids(&[1, 2, 9]), &ids(&[3, 4, 5])));
        assert!(!is_disjoint(&ids(&[1, 4]), &ids(&[4])));
    }

    proptest! {
        #[test]
        fn test_partition(raw in proptest::collection::btree_set(1u32..200, 0..60), mask in proptest::collection::vec(any::<bool>(), 60)) {
            let all: Vec<TokenId> = raw.iter().copied().map(TokenId).collect();
            let part: Vec<TokenId> = all.iter().zip(mask.iter()).filter(|(_, keep)| **keep).map(|(t, _)| *t).collect();

            let rest = subtract(&all, &part);
            prop_assert!(is_disjoint(&rest, &part));
            prop_assert_eq!(union(&rest, &part), all);
        }
    }
}
