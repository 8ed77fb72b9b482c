use rand::Rng;

use crate::model::WordRecord;

//
// ─── WEIGHTED DRAW ─────────────────────────────────────────────────────────────
//

/// Floor applied to mastery before weighting.
///
/// Draw weights are `1 / mastery`, which is undefined at exactly 0. Flooring
/// here keeps the scheduler total over every valid record instead of relying
/// on callers to never hand it a zero-mastery word.
pub const MASTERY_WEIGHT_FLOOR: f64 = 1e-4;

/// Pick the next word to drill, biased toward low mastery.
///
/// Each record gets weight `1 / max(mastery, MASTERY_WEIGHT_FLOOR)`, so a
/// word at mastery 0.1 is ten times as likely to be drawn as one at 1.0.
/// Draws are independent turn to turn; the same word can come up again.
///
/// Returns `None` when the vocabulary is empty. That is the normal
/// "no more words" display state, not an error.
pub fn pick_next<'a, R: Rng + ?Sized>(
    records: &'a [WordRecord],
    rng: &mut R,
) -> Option<&'a WordRecord> {
    pick_index(records, rng).map(|i| &records[i])
}

/// Index variant of [`pick_next`], for callers that track position.
pub fn pick_index<R: Rng + ?Sized>(records: &[WordRecord], rng: &mut R) -> Option<usize> {
    if records.is_empty() {
        return None;
    }

    let weights: Vec<f64> = records
        .iter()
        .map(|r| 1.0 / r.mastery().max(MASTERY_WEIGHT_FLOOR))
        .collect();
    let total: f64 = weights.iter().sum();

    // Cumulative-distribution sample: walk the weights until the running sum
    // passes the drawn point. The final index catches any accumulated float
    // shortfall.
    let point = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (index, weight) in weights.iter().enumerate() {
        cumulative += weight;
        if point < cumulative {
            return Some(index);
        }
    }
    Some(records.len() - 1)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn word(term: &str, mastery: f64) -> WordRecord {
        WordRecord::new(term, vec!["x".to_owned()], mastery).unwrap()
    }

    #[test]
    fn empty_vocabulary_yields_none() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(pick_next(&[], &mut rng).is_none());
    }

    #[test]
    fn single_record_is_always_picked() {
        let records = vec![word("cat", 0.5)];
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..50 {
            assert_eq!(pick_next(&records, &mut rng).unwrap().term(), "cat");
        }
    }

    #[test]
    fn zero_mastery_draws_without_panicking() {
        let records = vec![word("cat", 0.0), word("dog", 1.0)];
        let mut rng = StdRng::seed_from_u64(3);
        let mut cat_draws = 0_u32;
        for _ in 0..1000 {
            if pick_next(&records, &mut rng).unwrap().term() == "cat" {
                cat_draws += 1;
            }
        }
        // With the floor, a zero-mastery word dominates the distribution.
        assert!(cat_draws > 900);
    }

    #[test]
    fn draw_bias_approaches_inverse_mastery_ratio() {
        // Mastery 0.1 vs 0.9 should be drawn roughly 9:1.
        let records = vec![word("weak", 0.1), word("strong", 0.9)];
        let mut rng = StdRng::seed_from_u64(4);

        let draws = 90_000_u32;
        let mut weak = 0_u32;
        for _ in 0..draws {
            if pick_index(&records, &mut rng).unwrap() == 0 {
                weak += 1;
            }
        }

        let ratio = f64::from(weak) / f64::from(draws - weak);
        assert!(
            (8.0..10.0).contains(&ratio),
            "expected ~9:1 bias, got {ratio:.2}:1"
        );
    }

    #[test]
    fn uniform_mastery_spreads_draws_evenly() {
        let records = vec![word("a", 0.5), word("b", 0.5), word("c", 0.5)];
        let mut rng = StdRng::seed_from_u64(5);

        let mut counts = [0_u32; 3];
        for _ in 0..30_000 {
            counts[pick_index(&records, &mut rng).unwrap()] += 1;
        }

        for count in counts {
            assert!((9_000..11_000).contains(&count), "skewed counts {counts:?}");
        }
    }
}
