// Statistics tests
// Author: Gabriel Demetrios Lafis

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use student_analytics_engine::processing::{
    compute, mean, median, pearson_correlation, percentile_rank, std_dev, summarize, variance,
    z_score_outliers, ProcessingError, StatsType,
};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_median_odd_and_even() {
    assert_eq!(median(&[3.2, 3.8, 3.9]).unwrap(), 3.8);
    assert!(approx(median(&[3.0, 3.2, 3.8, 3.9]).unwrap(), 3.5));
    assert_eq!(median(&[2.5]).unwrap(), 2.5);
}

#[test]
fn test_median_permutation_invariant() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut values = vec![3.9, 1.2, 2.8, 3.3, 0.7, 4.0, 2.2, 3.3];
    let expected = median(&values).unwrap();

    for _ in 0..20 {
        values.shuffle(&mut rng);
        assert_eq!(median(&values).unwrap(), expected);
    }
}

#[test]
fn test_mean_and_std_dev() {
    let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];

    assert_eq!(mean(&values).unwrap(), 5.0);
    assert_eq!(variance(&values).unwrap(), 4.0);
    assert_eq!(std_dev(&values).unwrap(), 2.0);
}

#[test]
fn test_std_dev_constant_series_is_zero() {
    assert_eq!(std_dev(&[3.8, 3.8, 3.8]).unwrap(), 0.0);
    assert_eq!(std_dev(&[1.7]).unwrap(), 0.0);
}

#[test]
fn test_empty_input_rejected() {
    assert!(matches!(mean(&[]), Err(ProcessingError::EmptyInput(_))));
    assert!(matches!(median(&[]), Err(ProcessingError::EmptyInput(_))));
    assert!(matches!(std_dev(&[]), Err(ProcessingError::EmptyInput(_))));
    assert!(matches!(summarize(&[]), Err(ProcessingError::EmptyInput(_))));
    assert!(matches!(percentile_rank(&[], 1.0), Err(ProcessingError::EmptyInput(_))));
}

#[test]
fn test_pearson_perfect_correlation() {
    assert_eq!(pearson_correlation(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap(), 1.0);
    assert_eq!(pearson_correlation(&[1.0, 2.0, 3.0], &[6.0, 4.0, 2.0]).unwrap(), -1.0);
}

#[test]
fn test_pearson_symmetric_and_bounded() {
    let xs = [20.0, 22.0, 19.0, 25.0, 21.0];
    let ys = [3.8, 3.2, 3.9, 2.9, 3.5];

    let r = pearson_correlation(&xs, &ys).unwrap();
    assert!(approx(r, pearson_correlation(&ys, &xs).unwrap()));
    assert!((-1.0..=1.0).contains(&r));
    assert!(r < 0.0);
}

#[test]
fn test_pearson_degenerate_input() {
    assert!(matches!(
        pearson_correlation(&[1.0, 2.0], &[1.0, 2.0, 3.0]),
        Err(ProcessingError::InvalidArgument(_))
    ));
    assert!(matches!(
        pearson_correlation(&[1.0], &[2.0]),
        Err(ProcessingError::DegenerateInput(_))
    ));
    assert!(matches!(
        pearson_correlation(&[3.8, 3.8, 3.8], &[1.0, 2.0, 3.0]),
        Err(ProcessingError::DegenerateInput(_))
    ));
}

#[test]
fn test_percentile_rank() {
    let values = [3.2, 3.8, 3.9, 4.0];

    assert_eq!(percentile_rank(&values, 3.9).unwrap(), 0.5);
    assert_eq!(percentile_rank(&values, 0.0).unwrap(), 0.0);
    assert_eq!(percentile_rank(&values, 5.0).unwrap(), 1.0);
}

#[test]
fn test_z_score_outliers() {
    let mut values = vec![3.0; 10];
    values.push(0.5);

    assert_eq!(z_score_outliers(&values, 2.0).unwrap(), vec![0.5]);
    assert!(z_score_outliers(&values, 5.0).unwrap().is_empty());
    assert!(matches!(
        z_score_outliers(&[2.0, 2.0], 1.0),
        Err(ProcessingError::DegenerateInput(_))
    ));
}

#[test]
fn test_summary_and_compute() {
    let values = [3.8, 3.2, 3.9];
    let summary = summarize(&values).unwrap();

    assert_eq!(summary.count, 3);
    assert_eq!(summary.median, 3.8);
    assert_eq!(summary.min, 3.2);
    assert_eq!(summary.max, 3.9);
    assert!(approx(summary.mean, 3.6333333333333333));

    let kind: StatsType = "median".parse().unwrap();
    assert_eq!(compute(kind, &values).unwrap(), 3.8);
    assert_eq!(compute(StatsType::Count, &values).unwrap(), 3.0);
    assert!("mode".parse::<StatsType>().is_err());
}
