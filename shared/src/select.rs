use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::models::Spot;

/// Draws `k` items uniformly without replacement. Inputs no larger than `k`
/// come back untouched.
pub fn pick_random<T: Clone, R: Rng + ?Sized>(items: &[T], k: usize, rng: &mut R) -> Vec<T> {
    if items.len() <= k {
        return items.to_vec();
    }
    let mut shuffled = items.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(k);
    shuffled
}

/// Keeps the first spot seen for every id, preserving order.
pub fn dedupe_by_id(spots: Vec<Spot>) -> Vec<Spot> {
    let mut seen = HashSet::new();
    spots
        .into_iter()
        .filter(|spot| seen.insert(spot.id.clone()))
        .collect()
}

/// Appends the spots of a new roll that history does not know yet.
pub fn merge_into_history(history: &mut Vec<Spot>, fresh: &[Spot]) {
    let mut known: HashSet<String> = history.iter().map(|spot| spot.id.clone()).collect();
    for spot in fresh {
        if known.insert(spot.id.clone()) {
            history.push(spot.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn spot(id: &str, name: &str) -> Spot {
        Spot::new(id, name, Coordinate::new(35.0, 139.0))
    }

    #[test]
    fn small_input_is_returned_unchanged() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(pick_random(&[1, 2, 3], 3, &mut rng), vec![1, 2, 3]);
        assert_eq!(pick_random(&[4, 5], 3, &mut rng), vec![4, 5]);
        assert!(pick_random::<u8, _>(&[], 3, &mut rng).is_empty());
    }

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let first = vec![spot("node/1", "A"), spot("node/2", "B")];
        let second = vec![spot("node/2", "B again"), spot("way/2", "C")];
        let merged = dedupe_by_id(first.into_iter().chain(second).collect());

        let ids: Vec<&str> = merged.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["node/1", "node/2", "way/2"]);
        assert_eq!(merged[1].name, "B");
    }

    #[test]
    fn history_skips_known_spots() {
        let mut history = vec![spot("node/1", "A")];
        merge_into_history(&mut history, &[spot("node/1", "A"), spot("node/3", "C")]);
        let ids: Vec<&str> = history.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["node/1", "node/3"]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_pick_random_draws_k_unique(
                len in 4usize..40,
                k in 0usize..4,
                seed in any::<u64>()
            ) {
                let items: Vec<usize> = (0..len).collect();
                let mut rng = StdRng::seed_from_u64(seed);
                let picked = pick_random(&items, k, &mut rng);
                prop_assert_eq!(picked.len(), k);
                let unique: HashSet<usize> = picked.iter().copied().collect();
                prop_assert_eq!(unique.len(), k);
                prop_assert!(picked.iter().all(|item| *item < len));
            }

            #[test]
            fn prop_dedupe_yields_unique_ids(ids in prop::collection::vec(0u8..10, 0..30)) {
                let spots: Vec<Spot> = ids
                    .iter()
                    .map(|id| spot(&format!("node/{id}"), "x"))
                    .collect();
                let deduped = dedupe_by_id(spots);
                let unique: HashSet<&str> = deduped.iter().map(|s| s.id.as_str()).collect();
                prop_assert_eq!(unique.len(), deduped.len());
                let expected: HashSet<u8> = ids.into_iter().collect();
                prop_assert_eq!(deduped.len(), expected.len());
            }
        }
    }
}
