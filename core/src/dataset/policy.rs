use crate::dataset::Record;
use crate::error::{HemoprepError, Result};
use crate::types::DatasetPolicy;
use log::info;
use rand::seq::index;
use rand::Rng;

/// Selects the active record list for `policy`
///
/// `All` keeps the list untouched. `PosEqNeg` keeps every positive record
/// in index order, followed by a uniform draw without replacement of as
/// many negatives, kept in their index order.
///
/// # Errors
///
/// Returns `InsufficientNegatives` when `PosEqNeg` cannot draw enough
/// negatives.
pub fn apply_dataset_policy<R: Rng + ?Sized>(
    records: Vec<Record>,
    policy: DatasetPolicy,
    rng: &mut R,
) -> Result<Vec<Record>> {
    match policy {
        DatasetPolicy::All => Ok(records),
        DatasetPolicy::PosEqNeg => balance_positives(records, rng),
    }
}

fn balance_positives<R: Rng + ?Sized>(records: Vec<Record>, rng: &mut R) -> Result<Vec<Record>> {
    let (positives, negatives): (Vec<Record>, Vec<Record>) =
        records.into_iter().partition(Record::is_positive);

    if negatives.len() < positives.len() {
        return Err(HemoprepError::InsufficientNegatives {
            positives: positives.len(),
            negatives: negatives.len(),
        });
    }

    let mut picked = index::sample(rng, negatives.len(), positives.len()).into_vec();
    picked.sort_unstable();

    info!(
        "pos==neg: {} positives, {} of {} negatives",
        positives.len(),
        picked.len(),
        negatives.len()
    );

    let mut negatives: Vec<Option<Record>> = negatives.into_iter().map(Some).collect();
    let mut selected = positives;
    selected.extend(picked.into_iter().filter_map(|i| negatives[i].take()));
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::record::tests::record;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;
    use std::collections::HashSet;

    fn records(positives: usize, negatives: usize) -> Vec<Record> {
        let mut out = Vec::new();
        for i in 0..positives.max(negatives) {
            if i < positives {
                out.push(record(&format!("pos_{}", i), 0, "any"));
            }
            if i < negatives {
                out.push(record(&format!("neg_{}", i), 0, ""));
            }
        }
        out
    }

    #[test]
    fn test_all_keeps_everything() {
        let input = records(3, 7);
        let mut rng = StdRng::seed_from_u64(0);
        let out = apply_dataset_policy(input.clone(), DatasetPolicy::All, &mut rng).unwrap();
        assert_eq!(out, input);
    }

    #[rstest]
    #[case(3, 7)]
    #[case(5, 5)]
    #[case(1, 100)]
    fn test_pos_eq_neg_balances(#[case] positives: usize, #[case] negatives: usize) {
        let input = records(positives, negatives);
        let mut rng = StdRng::seed_from_u64(42);
        let out = apply_dataset_policy(input.clone(), DatasetPolicy::PosEqNeg, &mut rng).unwrap();

        assert_eq!(out.len(), 2 * positives);
        assert!(out[..positives].iter().all(Record::is_positive));
        assert!(out[positives..].iter().all(|r| !r.is_positive()));
        assert!(out.iter().all(|r| input.contains(r)));

        let ids: HashSet<&str> = out.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), out.len());
    }

    #[test]
    fn test_positives_keep_index_order() {
        let mut rng = StdRng::seed_from_u64(1);
        let out = apply_dataset_policy(records(4, 9), DatasetPolicy::PosEqNeg, &mut rng).unwrap();
        let ids: Vec<&str> = out[..4].iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["pos_0", "pos_1", "pos_2", "pos_3"]);
    }

    #[test]
    fn test_sampled_negatives_keep_index_order() {
        let mut rng = StdRng::seed_from_u64(7);
        let out = apply_dataset_policy(records(5, 50), DatasetPolicy::PosEqNeg, &mut rng).unwrap();
        let picked: Vec<usize> = out[5..]
            .iter()
            .map(|r| r.id.trim_start_matches("neg_").parse().unwrap())
            .collect();
        assert!(picked.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_same_seed_same_selection() {
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            apply_dataset_policy(records(5, 40), DatasetPolicy::PosEqNeg, &mut rng).unwrap()
        };
        assert_eq!(run(9), run(9));
    }

    #[test]
    fn test_too_few_negatives() {
        let mut rng = StdRng::seed_from_u64(0);
        let err =
            apply_dataset_policy(records(4, 2), DatasetPolicy::PosEqNeg, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            HemoprepError::InsufficientNegatives {
                positives: 4,
                negatives: 2
            }
        ));
    }

    #[test]
    fn test_no_positives_gives_empty_list() {
        let mut rng = StdRng::seed_from_u64(0);
        let out = apply_dataset_policy(records(0, 6), DatasetPolicy::PosEqNeg, &mut rng).unwrap();
        assert!(out.is_empty());
    }
}
