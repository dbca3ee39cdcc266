use ndarray::Array1;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::{Error, Result};

/// Row indices of a train/test partition.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Seeded split that keeps each class's share the same in both partitions.
///
/// `ceil(test_fraction * n)` rows are held out. Each class gets the floor of
/// its proportional share of the test rows, and the leftover slots go to the
/// classes with the largest fractional remainders.
pub fn stratified_split(labels: &Array1<bool>, test_fraction: f64, seed: u64) -> Result<Split> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(Error::Split(format!(
            "test fraction must lie in (0, 1), got {test_fraction}"
        )));
    }

    let n = labels.len();
    let mut classes: Vec<Vec<usize>> = vec![Vec::new(), Vec::new()];
    for (i, &label) in labels.iter().enumerate() {
        classes[usize::from(label)].push(i);
    }
    classes.retain(|members| !members.is_empty());

    if classes.len() < 2 {
        return Err(Error::Split(
            "only one class present; stratification needs both labels".to_string(),
        ));
    }
    if let Some(smallest) = classes.iter().map(Vec::len).min().filter(|&m| m < 2) {
        return Err(Error::Split(format!(
            "the least populated class has only {smallest} member, too few to stratify"
        )));
    }

    let n_test = (test_fraction * n as f64).ceil() as usize;
    let n_train = n - n_test;
    if n_test < classes.len() || n_train < classes.len() {
        return Err(Error::Split(format!(
            "{n_test} test / {n_train} train rows cannot hold {} classes",
            classes.len()
        )));
    }

    let quotas = allocate(&classes, n_test, n);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(n_train);
    let mut test = Vec::with_capacity(n_test);
    for (members, quota) in classes.iter_mut().zip(quotas) {
        members.shuffle(&mut rng);
        test.extend_from_slice(&members[..quota]);
        train.extend_from_slice(&members[quota..]);
    }
    train.shuffle(&mut rng);
    test.shuffle(&mut rng);

    Ok(Split { train, test })
}

fn allocate(classes: &[Vec<usize>], n_test: usize, n: usize) -> Vec<usize> {
    let shares: Vec<f64> = classes
        .iter()
        .map(|m| m.len() as f64 * n_test as f64 / n as f64)
        .collect();
    let mut quotas: Vec<usize> = shares.iter().map(|s| s.floor() as usize).collect();

    let mut order: Vec<usize> = (0..classes.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = shares[a] - shares[a].floor();
        let rb = shares[b] - shares[b].floor();
        rb.total_cmp(&ra)
            .then_with(|| classes[b].len().cmp(&classes[a].len()))
    });

    let mut remaining = n_test - quotas.iter().sum::<usize>();
    for &class in order.iter().cycle() {
        if remaining == 0 {
            break;
        }
        if quotas[class] < classes[class].len() {
            quotas[class] += 1;
            remaining -= 1;
        }
    }
    quotas
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn labels(n: usize, positives: usize) -> Array1<bool> {
        (0..n).map(|i| i % (n / positives) == 0 && i / (n / positives) < positives).collect()
    }

    fn positive_ratio(labels: &Array1<bool>, idx: &[usize]) -> f64 {
        idx.iter().filter(|&&i| labels[i]).count() as f64 / idx.len() as f64
    }

    #[test]
    fn partitions_are_disjoint_and_cover_all_rows() {
        let y = labels(800, 40);
        let split = stratified_split(&y, 0.25, 42).unwrap();
        assert_eq!(split.test.len(), 200);
        assert_eq!(split.train.len(), 600);

        let train: HashSet<_> = split.train.iter().copied().collect();
        let test: HashSet<_> = split.test.iter().copied().collect();
        assert!(train.is_disjoint(&test));
        assert_eq!(train.len() + test.len(), 800);
    }

    #[test]
    fn class_ratio_is_preserved() {
        let y = labels(800, 40);
        let split = stratified_split(&y, 0.25, 42).unwrap();
        assert!((positive_ratio(&y, &split.test) - 0.05).abs() < 0.01);
        assert!((positive_ratio(&y, &split.train) - 0.05).abs() < 0.01);
    }

    #[test]
    fn odd_sizes_round_test_size_up() {
        let y = labels(801, 41);
        let split = stratified_split(&y, 0.25, 7).unwrap();
        assert_eq!(split.test.len(), 201);
        assert_eq!(split.train.len(), 600);
    }

    #[test]
    fn same_seed_same_split() {
        let y = labels(100, 10);
        assert_eq!(
            stratified_split(&y, 0.25, 42).unwrap(),
            stratified_split(&y, 0.25, 42).unwrap()
        );
        assert_ne!(
            stratified_split(&y, 0.25, 42).unwrap(),
            stratified_split(&y, 0.25, 43).unwrap()
        );
    }

    #[test]
    fn zero_positives_is_fatal() {
        let y = Array1::from_elem(50, false);
        assert!(matches!(stratified_split(&y, 0.25, 42), Err(Error::Split(_))));
    }

    #[test]
    fn singleton_class_is_fatal() {
        let mut y = Array1::from_elem(50, false);
        y[3] = true;
        assert!(matches!(stratified_split(&y, 0.25, 42), Err(Error::Split(_))));
    }

    #[test]
    fn fraction_out_of_range_is_fatal() {
        let y = labels(20, 4);
        assert!(stratified_split(&y, 0.0, 42).is_err());
        assert!(stratified_split(&y, 1.0, 42).is_err());
    }
}
