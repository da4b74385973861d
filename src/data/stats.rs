use std::collections::BTreeMap;
use std::f64::consts::PI;

// ---------------------------------------------------------------------------
// Value counts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueCount {
    pub label: String,
    pub count: usize,
}

/// Occurrences per label, most frequent first; ties by label.
pub fn value_counts(labels: &[String]) -> Vec<ValueCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for label in labels {
        *counts.entry(label.as_str()).or_default() += 1;
    }
    let mut out: Vec<ValueCount> = counts
        .into_iter()
        .map(|(label, count)| ValueCount {
            label: label.to_string(),
            count,
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    out
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Equal-width bins. `edges` has one more entry than `counts`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        match (self.edges.first(), self.edges.last()) {
            (Some(lo), Some(hi)) if !self.counts.is_empty() => (hi - lo) / self.counts.len() as f64,
            _ => 0.0,
        }
    }

    pub fn centers(&self) -> impl Iterator<Item = f64> + '_ {
        self.edges.windows(2).map(|w| (w[0] + w[1]) / 2.0)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

fn finite_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Bins span `[min, max]` of the finite values, last bin closed on the
/// right. A single distinct value gets the range `[v - 0.5, v + 0.5]`.
pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    if bins == 0 {
        return None;
    }
    let (mut lo, mut hi) = finite_range(values)?;
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();

    let mut counts = vec![0usize; bins];
    for v in values.iter().copied().filter(|v| v.is_finite()) {
        counts[bin_index(v, lo, width, &edges)] += 1;
    }

    Some(Histogram { edges, counts })
}

/// Bin of `v`. The division can round across an edge, so the guess is
/// corrected against the stored edges; a value on an interior edge belongs
/// to the bin on its right.
fn bin_index(v: f64, lo: f64, width: f64, edges: &[f64]) -> usize {
    let bins = edges.len() - 1;
    let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
    if v < edges[idx] {
        idx.saturating_sub(1)
    } else if idx + 1 < bins && v >= edges[idx + 1] {
        idx + 1
    } else {
        idx
    }
}

// ---------------------------------------------------------------------------
// Kernel density estimate
// ---------------------------------------------------------------------------

fn sample_std(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (ss / (n - 1.0)).sqrt()
}

/// Scott's rule: `std(ddof=1) * n^(-1/5)`. None without spread.
fn scott_bandwidth(data: &[f64]) -> Option<f64> {
    if data.len() < 2 {
        return None;
    }
    let std = sample_std(data);
    if std <= 0.0 || !std.is_finite() {
        return None;
    }
    Some(std * (data.len() as f64).powf(-0.2))
}

/// Gaussian mixture density at `x`; integrates to 1 over the real line.
fn kde_density(data: &[f64], bandwidth: f64, x: f64) -> f64 {
    let norm = 1.0 / (data.len() as f64 * bandwidth * (2.0 * PI).sqrt());
    data.iter()
        .map(|xi| {
            let u = (x - xi) / bandwidth;
            (-0.5 * u * u).exp()
        })
        .sum::<f64>()
        * norm
}

/// Gaussian KDE with Scott's bandwidth, evaluated on `points` evenly spaced
/// positions over the data range and multiplied by `scale`.
///
/// The full mixture integrates to `scale`; only the `[min, max]` part is
/// drawn, like a histogram overlay cut at the data range. Pass
/// `n * bin_width` as `scale` to overlay a count histogram. Returns an
/// empty curve for fewer than two finite values or zero spread.
pub fn kde_curve(values: &[f64], scale: f64, points: usize) -> Vec<[f64; 2]> {
    let data: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if points < 2 {
        return Vec::new();
    }
    let (Some(bandwidth), Some((lo, hi))) = (scott_bandwidth(&data), finite_range(&data)) else {
        return Vec::new();
    };
    let step = (hi - lo) / (points - 1) as f64;

    (0..points)
        .map(|i| {
            let x = lo + step * i as f64;
            [x, kde_density(&data, bandwidth, x) * scale]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn value_counts_orders_by_frequency() {
        let counts = value_counts(&labels(&["Benign", "Malignant", "Benign", "Benign", "Malignant"]));
        assert_eq!(
            counts,
            vec![
                ValueCount { label: "Benign".into(), count: 3 },
                ValueCount { label: "Malignant".into(), count: 2 },
            ]
        );
    }

    #[test]
    fn value_counts_breaks_ties_by_label() {
        let counts = value_counts(&labels(&["Malignant", "Benign"]));
        assert_eq!(counts[0].label, "Benign");
        assert!(value_counts(&[]).is_empty());
    }

    #[test]
    fn histogram_counts_every_value() {
        let values = [50.0, 55.0, 60.0, 70.0, 88.0, 91.0, 99.0, 100.0];
        let hist = histogram(&values, 10).unwrap();
        assert_eq!(hist.counts.len(), 10);
        assert_eq!(hist.edges.len(), 11);
        assert_eq!(hist.total(), values.len());
        assert!((hist.bin_width() - 5.0).abs() < 1e-12);
        // max lands in the last bin, min in the first
        assert_eq!(hist.counts[0], 1);
        assert_eq!(hist.counts[9], 2);
    }

    #[test]
    fn histogram_of_constant_values_is_centred() {
        let hist = histogram(&[80.0, 80.0, 80.0], 10).unwrap();
        assert_eq!(hist.edges[0], 79.5);
        assert_eq!(hist.edges[10], 80.5);
        assert_eq!(hist.total(), 3);
        assert_eq!(hist.counts[5], 3);
    }

    #[test]
    fn histogram_skips_non_finite_and_empty() {
        assert!(histogram(&[], 10).is_none());
        assert!(histogram(&[f64::NAN], 10).is_none());
        let hist = histogram(&[1.0, f64::NAN, 2.0], 2).unwrap();
        assert_eq!(hist.total(), 2);
        assert_eq!(hist.centers().collect::<Vec<_>>(), vec![1.25, 1.75]);
    }

    #[test]
    fn kde_is_symmetric_for_symmetric_data() {
        let values = [60.0, 70.0, 80.0, 90.0, 100.0];
        let curve = kde_curve(&values, 1.0, 41);
        assert_eq!(curve.len(), 41);
        assert_eq!(curve[0][0], 60.0);
        assert!((curve[40][0] - 100.0).abs() < 1e-9);
        for i in 0..20 {
            assert!((curve[i][1] - curve[40 - i][1]).abs() < 1e-12);
        }
        // peak at the centre
        let peak = curve
            .iter()
            .max_by(|a, b| a[1].total_cmp(&b[1]))
            .unwrap();
        assert_eq!(peak[0], 80.0);
    }

    #[test]
    fn kde_scale_multiplies_density() {
        let values = [1.0, 2.0, 4.0];
        let unit = kde_curve(&values, 1.0, 5);
        let scaled = kde_curve(&values, 6.0, 5);
        for (u, s) in unit.iter().zip(&scaled) {
            assert!((s[1] - 6.0 * u[1]).abs() < 1e-12);
        }
        let total: f64 = unit.iter().map(|p| p[1]).sum();
        assert!(total > 0.0);
    }

    #[test]
    fn interior_edge_values_fall_in_the_bin_above() {
        for i in 0..200 {
            let lo = i as f64 * 0.37;
            let hi = lo + 1.3 + i as f64 * 0.11;
            let base = histogram(&[lo, hi], 10).unwrap();
            for k in 1..10 {
                let edge = base.edges[k];
                let hist = histogram(&[lo, hi, edge], 10).unwrap();
                assert_eq!(hist.edges, base.edges);
                let added: Vec<usize> = (0..10)
                    .filter(|&b| hist.counts[b] != base.counts[b])
                    .collect();
                assert_eq!(added, vec![k], "range [{lo}, {hi}], edge {k} = {edge}");
            }
        }
    }

    fn trapezoid(curve: &[[f64; 2]]) -> f64 {
        curve
            .windows(2)
            .map(|w| (w[1][0] - w[0][0]) * (w[0][1] + w[1][1]) / 2.0)
            .sum()
    }

    #[test]
    fn kde_mixture_integrates_to_scale_and_curve_is_cut_at_data_range() {
        let values = [60.0, 70.0, 80.0, 90.0, 100.0];
        let hist = histogram(&values, 10).unwrap();
        let scale = hist.total() as f64 * hist.bin_width();
        let h = scott_bandwidth(&values).unwrap();

        let (lo, hi) = (60.0 - 5.0 * h, 100.0 + 5.0 * h);
        let steps = 4000;
        let full: Vec<[f64; 2]> = (0..=steps)
            .map(|i| {
                let x = lo + (hi - lo) * i as f64 / steps as f64;
                [x, kde_density(&values, h, x) * scale]
            })
            .collect();
        let full_area = trapezoid(&full);
        assert!((full_area - scale).abs() < 1e-3 * scale, "{full_area} vs {scale}");

        let drawn = kde_curve(&values, scale, 200);
        let drawn_area = trapezoid(&drawn);
        assert!(drawn_area < full_area);
        assert!(drawn_area > 0.5 * scale);
    }

    #[test]
    fn kde_needs_spread() {
        assert!(kde_curve(&[5.0], 1.0, 10).is_empty());
        assert!(kde_curve(&[5.0, 5.0, 5.0], 1.0, 10).is_empty());
    }
}
