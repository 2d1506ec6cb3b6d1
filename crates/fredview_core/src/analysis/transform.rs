//! Single-series transformations.

use crate::model::observation::{Observation, Series};
use crate::model::view::TransformKind;

/// Lag used by [`TransformKind::PctChangeYoy`]. Assumes monthly cadence.
pub const YOY_LAG: usize = 12;

/// Applies `kind` to `series`.
///
/// Missing values are dropped first; lags and the index base are taken over
/// the remaining points. The result keeps `series_id`, and every observation
/// in it has a finite value.
pub fn transform(series: &Series, kind: TransformKind) -> Series {
    let points = series.points();
    let values: Vec<f64> = points.iter().map(|point| point.value).collect();

    let transformed: Vec<Option<f64>> = match kind {
        TransformKind::Raw => values.iter().copied().map(Some).collect(),
        TransformKind::PctChangeMom => pct_change(&values, 1),
        TransformKind::PctChangeYoy => pct_change(&values, YOY_LAG),
        TransformKind::Index100 => match values.first().copied() {
            Some(base) => values.iter().map(|value| Some(value / base * 100.0)).collect(),
            None => Vec::new(),
        },
    };

    Series {
        series_id: series.series_id.clone(),
        observations: points
            .iter()
            .zip(transformed)
            .filter_map(|(point, value)| {
                value
                    .filter(|value| value.is_finite())
                    .map(|value| Observation::new(point.date, Some(value)))
            })
            .collect(),
    }
}

/// Percent change against the value `lag` positions back; `None` where no
/// reference exists.
fn pct_change(values: &[f64], lag: usize) -> Vec<Option<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            index
                .checked_sub(lag)
                .map(|reference| (value / values[reference] - 1.0) * 100.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{transform, YOY_LAG};
    use crate::model::observation::{Observation, Series};
    use crate::model::view::TransformKind;
    use chrono::NaiveDate;

    fn month(index: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020 + (index / 12) as i32, index % 12 + 1, 1).unwrap()
    }

    fn series_of(values: &[Option<f64>]) -> Series {
        Series {
            series_id: "S1".to_string(),
            observations: values
                .iter()
                .enumerate()
                .map(|(index, value)| Observation::new(month(index as u32), *value))
                .collect(),
        }
    }

    fn values_of(series: &Series) -> Vec<f64> {
        series
            .observations
            .iter()
            .map(|observation| observation.value.unwrap())
            .collect()
    }

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{actual:?} vs {expected:?}");
        }
    }

    #[test]
    fn raw_drops_missing_and_is_idempotent() {
        let input = series_of(&[Some(1.0), None, Some(3.0)]);
        let once = transform(&input, TransformKind::Raw);
        assert_eq!(once.len(), 2);
        assert_eq!(once.series_id, "S1");
        assert_eq!(once.observations[1].date, month(2));

        let twice = transform(&once, TransformKind::Raw);
        assert_eq!(once, twice);
    }

    #[test]
    fn mom_scenario_yields_ten_percent_steps() {
        let input = series_of(&[Some(100.0), Some(110.0), Some(121.0)]);
        let output = transform(&input, TransformKind::PctChangeMom);

        assert_eq!(output.observations[0].date, month(1));
        assert_eq!(output.observations[1].date, month(2));
        assert_close(&values_of(&output), &[10.0, 10.0]);
    }

    #[test]
    fn mom_output_is_shorter_than_input() {
        for n in 1..6 {
            let values: Vec<Option<f64>> = (1..=n).map(|v| Some(v as f64)).collect();
            let output = transform(&series_of(&values), TransformKind::PctChangeMom);
            assert!(output.len() <= n - 1);
        }
        let empty = transform(&series_of(&[]), TransformKind::PctChangeMom);
        assert!(empty.is_empty());
    }

    #[test]
    fn mom_drops_points_after_a_zero_reference() {
        let input = series_of(&[Some(0.0), Some(5.0), Some(10.0)]);
        let output = transform(&input, TransformKind::PctChangeMom);
        assert_eq!(output.len(), 1);
        assert_eq!(output.observations[0].date, month(2));
        assert_close(&values_of(&output), &[100.0]);
    }

    #[test]
    fn yoy_uses_twelve_point_lag() {
        let values: Vec<Option<f64>> = (0..14).map(|v| Some(100.0 + v as f64)).collect();
        let output = transform(&series_of(&values), TransformKind::PctChangeYoy);

        assert_eq!(output.len(), 14 - YOY_LAG);
        assert_eq!(output.observations[0].date, month(12));
        assert_close(&values_of(&output), &[12.0, 1200.0 / 101.0]);
    }

    #[test]
    fn index_100_starts_at_100_and_is_scale_invariant() {
        let values = [Some(100.0), Some(150.0), Some(75.0)];
        let output = transform(&series_of(&values), TransformKind::Index100);
        assert_close(&values_of(&output), &[100.0, 150.0, 75.0]);

        let scaled: Vec<Option<f64>> = values.iter().map(|v| v.map(|v| v * -3.5)).collect();
        let scaled_output = transform(&series_of(&scaled), TransformKind::Index100);
        assert_close(&values_of(&scaled_output), &values_of(&output));
    }

    #[test]
    fn index_100_uses_first_present_value_as_base() {
        let output = transform(
            &series_of(&[None, Some(50.0), Some(100.0)]),
            TransformKind::Index100,
        );
        assert_eq!(output.observations[0].date, month(1));
        assert_close(&values_of(&output), &[100.0, 200.0]);
    }

    #[test]
    fn index_100_with_zero_base_drops_every_point() {
        let output = transform(
            &series_of(&[Some(0.0), Some(1.0), Some(2.0)]),
            TransformKind::Index100,
        );
        assert!(output.is_empty());
    }
}
