//! Small numeric helpers shared by the builder.

/// Centred moving average over `window` values.
///
/// The output has the same length as the input. Near the ends the window is truncated to the
/// values available, so the edge averages are taken over fewer, asymmetric values rather than
/// wrapping or padding.
///
/// # Panics
/// Panics if `window` is not odd.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    assert!(window % 2 == 1, "moving average window must be odd");
    let half = window / 2;
    let len = values.len();

    (0..len)
        .map(|i| {
            let a = i.saturating_sub(half);
            let b = (i + half + 1).min(len);
            let w = &values[a..b];
            w.iter().sum::<f64>() / w.len() as f64
        })
        .collect()
}

/// Generate `start, start + step, ...` up to but not including `stop`.
///
/// If `endpoint` is set, `stop` is appended.
/// A non-positive `step` with `start < stop` yields only the endpoint (if requested).
pub fn arange(start: i64, step: i64, stop: i64, endpoint: bool) -> Vec<i64> {
    let mut v = Vec::new();
    if step > 0 {
        let mut x = start;
        while x < stop {
            v.push(x);
            x += step;
        }
    }
    if endpoint {
        v.push(stop);
    }
    v
}

/// Mean of the differences between consecutive values.
///
/// Returns `None` if there are fewer than two values.
pub fn mean_diff(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let mut iter = values.into_iter();
    let first = iter.next()?;
    let (last, n) = iter.fold((first, 0usize), |(_, n), x| (x, n + 1));
    // consecutive differences telescope
    (n > 0).then(|| (last - first) / n as f64)
}

/// Mean of the absolute differences between consecutive values.
pub fn mean_abs_diff(values: &[f64]) -> Option<f64> {
    (values.len() > 1).then(|| {
        values.windows(2).map(|w| (w[1] - w[0]).abs()).sum::<f64>() / (values.len() - 1) as f64
    })
}

/// Mean spacing between the _distinct_ sorted values.
pub fn mean_unique_spacing(values: &[f64]) -> Option<f64> {
    let mut v = values.to_vec();
    v.sort_by(f64::total_cmp);
    v.dedup();
    mean_diff(v).map(f64::abs)
}

/// Filters out spacings that cannot scale geometry (zero, NaN, infinite).
pub(crate) fn usable(spacing: Option<f64>) -> Option<f64> {
    spacing.filter(|s| s.is_finite() && *s > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::TestResult;

    #[test]
    fn moving_average_window_5() {
        let x = moving_average(&[0.0, 5.0, 10.0, 15.0, 20.0, 25.0], 5);
        // windows are truncated to 3, 4, 5, 5, 4, 3 values
        assert_eq!(x, vec![5.0, 7.5, 10.0, 15.0, 17.5, 20.0]);
    }

    #[test]
    fn moving_average_short_input() {
        assert_eq!(moving_average(&[], 5), Vec::<f64>::new());
        assert_eq!(moving_average(&[2.0], 5), vec![2.0]);
        assert_eq!(moving_average(&[2.0, 4.0], 5), vec![3.0, 3.0]);
    }

    #[test]
    #[should_panic]
    fn moving_average_even_window() {
        moving_average(&[1.0, 2.0], 4);
    }

    #[quickcheck]
    fn moving_average_preserves_length(values: Vec<f64>) -> TestResult {
        if values.iter().any(|x| !x.is_finite()) {
            return TestResult::discard();
        }
        TestResult::from_bool(moving_average(&values, 5).len() == values.len())
    }

    #[quickcheck]
    fn moving_average_of_constant(c: i32, len: u8) -> bool {
        let c = c as f64;
        let values = vec![c; len as usize];
        moving_average(&values, 5) == values
    }

    #[test]
    fn arange_testing() {
        assert_eq!(arange(1, 1, 4, false), vec![1, 2, 3]);
        assert_eq!(arange(1, 1, 4, true), vec![1, 2, 3, 4]);
        assert_eq!(arange(0, 2, 5, false), vec![0, 2, 4]);
        assert_eq!(arange(3, 1, 3, false), Vec::<i64>::new());
        assert_eq!(arange(1, 1, 1, true), vec![1]);
    }

    #[test]
    fn spacing_testing() {
        assert_eq!(mean_diff([0.0, 1.0, 2.0, 4.0]), Some(4.0 / 3.0));
        assert_eq!(mean_diff([1.0]), None);
        assert_eq!(mean_abs_diff(&[0.0, 2.0, 0.0, 2.0]), Some(2.0));
        assert_eq!(mean_unique_spacing(&[4.0, 0.0, 2.0, 2.0]), Some(2.0));
        assert_eq!(usable(Some(0.0)), None);
        assert_eq!(usable(Some(f64::NAN)), None);
        assert_eq!(usable(Some(0.5)), Some(0.5));
    }
}
