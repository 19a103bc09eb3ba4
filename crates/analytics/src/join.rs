use std::collections::HashMap;
use std::hash::Hash;

/// Hash left join.
///
/// Every left row appears at least once, in input order. A left row with
/// several matches is repeated once per match, in right-hand input order; a
/// left row without a match is paired with `None`. Keys are compared with
/// `Eq`, so a missing key component matches a missing key component.
pub(crate) fn left_join<'a, L, R, K>(
    left: &'a [L],
    right: &'a [R],
    left_key: impl Fn(&'a L) -> K,
    right_key: impl Fn(&'a R) -> K,
) -> Vec<(&'a L, Option<&'a R>)>
where
    K: Eq + Hash,
{
    let mut index: HashMap<K, Vec<&'a R>> = HashMap::new();
    for row in right {
        index.entry(right_key(row)).or_default().push(row);
    }

    let mut joined = Vec::with_capacity(left.len());
    for row in left {
        match index.get(&left_key(row)) {
            Some(matches) => joined.extend(matches.iter().map(|m| (row, Some(*m)))),
            None => joined.push((row, None)),
        }
    }

    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmatched_left_rows_are_kept() {
        let left = [("a", 1), ("b", 2)];
        let right = [("a", 10)];

        let joined = left_join(&left, &right, |l| l.0, |r| r.0);

        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0].1, Some(&("a", 10)));
        assert_eq!(joined[1].1, None);
    }

    #[test]
    fn fans_out_in_right_order() {
        let left = [("a", 1)];
        let right = [("a", 10), ("b", 0), ("a", 20)];

        let joined = left_join(&left, &right, |l| l.0, |r| r.0);
        let values: Vec<i32> = joined.iter().filter_map(|(_, r)| r.map(|r| r.1)).collect();

        assert_eq!(values, vec![10, 20]);
    }

    #[test]
    fn missing_keys_match_each_other() {
        let left: [Option<&str>; 1] = [None];
        let right: [Option<&str>; 2] = [Some("x"), None];

        let joined = left_join(&left, &right, |l| *l, |r| *r);

        assert_eq!(joined, vec![(&None, Some(&None))]);
    }
}
