/// Weighted mean of `(score, weight)` pairs.
///
/// Returns `None` when the weight sum is zero, which covers the empty input
/// case. Callers must treat `None` as "insufficient data", never as a zero
/// score: parent aggregations exclude empty scopes from their own mean.
pub fn weighted_mean(pairs: &[(f64, f64)]) -> Option<f64> {
    let weight_sum: f64 = pairs.iter().map(|(_, weight)| weight).sum();
    if weight_sum <= 0.0 {
        return None;
    }

    let score_sum: f64 = pairs.iter().map(|(score, weight)| score * weight).sum();
    Some(score_sum / weight_sum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_the_closed_form() {
        let pairs = [(3.0, 1.0), (5.0, 2.0), (1.0, 0.5)];
        let expected = (3.0 + 10.0 + 0.5) / 3.5;
        let mean = weighted_mean(&pairs).expect("non-zero weight sum");
        assert!((mean - expected).abs() < 1e-12);
    }

    #[test]
    fn reference_example_aggregates_to_ten_thirds() {
        let pairs = [(4.0, 2.0), (2.0, 1.0)];
        let mean = weighted_mean(&pairs).expect("non-zero weight sum");
        assert!((mean - 10.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn empty_input_yields_none_not_a_panic() {
        assert_eq!(weighted_mean(&[]), None);
    }

    #[test]
    fn zero_weight_sum_yields_none() {
        assert_eq!(weighted_mean(&[(4.0, 0.0), (2.0, 0.0)]), None);
    }

    #[test]
    fn single_pair_returns_its_score() {
        let mean = weighted_mean(&[(2.5, 3.0)]).expect("weight is positive");
        assert!((mean - 2.5).abs() < 1e-12);
    }
}
