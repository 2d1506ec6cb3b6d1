//! Two-series formula combiner.

use crate::model::observation::{DataPoint, Series};
use crate::model::view::CombineOp;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Label callers attach to a combined series.
pub const COMBINED_LABEL: &str = "Combined";

/// Combines `a` and `b` on the dates present in both.
///
/// Dates held by only one input, missing operands and non-finite results
/// (a zero denominator) produce no point. Series identifiers are discarded.
pub fn combine(a: &Series, b: &Series, op: CombineOp) -> Vec<DataPoint> {
    let right: BTreeMap<NaiveDate, f64> = b
        .points()
        .into_iter()
        .map(|point| (point.date, point.value))
        .collect();

    a.points()
        .into_iter()
        .filter_map(|left| {
            let right_value = right.get(&left.date)?;
            let value = apply(op, left.value, *right_value);
            value
                .is_finite()
                .then_some(DataPoint::new(left.date, value))
        })
        .collect()
}

fn apply(op: CombineOp, left: f64, right: f64) -> f64 {
    match op {
        CombineOp::Difference => left - right,
        CombineOp::Ratio => left / right,
    }
}

#[cfg(test)]
mod tests {
    use super::combine;
    use crate::model::observation::{Observation, Series};
    use crate::model::view::CombineOp;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, day).unwrap()
    }

    fn series(id: &str, points: &[(u32, Option<f64>)]) -> Series {
        Series::from_unordered(
            id,
            points
                .iter()
                .map(|(day, value)| Observation::new(d(*day), *value))
                .collect(),
        )
    }

    #[test]
    fn ratio_scenario_keeps_only_shared_dates() {
        let a = series("A", &[(1, Some(50.0)), (2, Some(60.0))]);
        let b = series("B", &[(1, Some(25.0)), (3, Some(30.0))]);

        let output = combine(&a, &b, CombineOp::Ratio);
        assert_eq!(output.len(), 1);
        assert_eq!(output[0].date, d(1));
        assert!((output[0].value - 2.0).abs() < 1e-12);
    }

    #[test]
    fn ratio_excludes_zero_denominators() {
        let a = series("A", &[(1, Some(1.0)), (2, Some(0.0)), (3, Some(3.0))]);
        let b = series("B", &[(1, Some(0.0)), (2, Some(0.0)), (3, Some(1.5))]);

        let output = combine(&a, &b, CombineOp::Ratio);
        assert_eq!(output.len(), 1);
        assert_eq!(output[0].date, d(3));
        assert!((output[0].value - 2.0).abs() < 1e-12);
    }

    #[test]
    fn difference_is_anti_symmetric() {
        let a = series("A", &[(1, Some(5.0)), (2, Some(7.5)), (4, Some(1.0))]);
        let b = series("B", &[(1, Some(2.0)), (2, Some(10.0)), (3, Some(9.0))]);

        let forward = combine(&a, &b, CombineOp::Difference);
        let backward = combine(&b, &a, CombineOp::Difference);

        assert_eq!(forward.len(), 2);
        assert_eq!(forward.len(), backward.len());
        for (f, r) in forward.iter().zip(&backward) {
            assert_eq!(f.date, r.date);
            assert_eq!(f.value, -r.value);
        }
    }

    #[test]
    fn missing_operands_produce_no_point() {
        let a = series("A", &[(1, None), (2, Some(4.0))]);
        let b = series("B", &[(1, Some(1.0)), (2, None)]);
        assert!(combine(&a, &b, CombineOp::Difference).is_empty());
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let a = series("A", &[]);
        let b = series("B", &[(1, Some(1.0))]);
        assert!(combine(&a, &b, CombineOp::Ratio).is_empty());
        assert!(combine(&b, &a, CombineOp::Ratio).is_empty());
    }
}
