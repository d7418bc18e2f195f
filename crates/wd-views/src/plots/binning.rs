//! Linear-scale tick rounding and fixed-threshold histogram binning
//!
//! Tick steps are 1, 2 or 5 times a power of ten, chosen so that roughly
//! `count` ticks cover the interval.

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = 1.4142135623730951; // sqrt(2)

/// Integer tick positions and step; a negative step means "divide by -step"
fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let inv = 10f64.powf(-power) / factor;
        i1 = (start * inv).round();
        i2 = (stop * inv).round();
        if i1 / inv < start {
            i1 += 1.0;
        }
        if i2 / inv > stop {
            i2 -= 1.0;
        }
        inc = -inv;
    } else {
        inc = 10f64.powf(power) * factor;
        i1 = (start / inc).round();
        i2 = (stop / inc).round();
        if i1 * inc < start {
            i1 += 1.0;
        }
        if i2 * inc > stop {
            i2 -= 1.0;
        }
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    tick_spec(start, stop, count as f64).2
}

/// Round tick values covering `[start, stop]`, at most about `count` of them
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || start.is_nan() || stop.is_nan() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let (i1, i2, inc) = tick_spec(lo, hi, count as f64);
    if !(i2 >= i1) || !inc.is_finite() {
        return Vec::new();
    }

    let n = (i2 - i1 + 1.0) as usize;
    let mut out: Vec<f64> = (0..n)
        .map(|i| {
            let k = i1 + i as f64;
            if inc < 0.0 {
                k / -inc
            } else {
                k * inc
            }
        })
        .collect();
    if reverse {
        out.reverse();
    }
    out
}

/// Extend `[min, max]` outward to round tick values
pub fn nice_domain(min: f64, max: f64, count: usize) -> (f64, f64) {
    let (mut start, mut stop) = if max < min { (max, min) } else { (min, max) };
    if !start.is_finite() || !stop.is_finite() || start == stop {
        return (start, stop);
    }

    let mut previous_step = None;
    for _ in 0..10 {
        let step = tick_increment(start, stop, count);
        if previous_step == Some(step) {
            break;
        } else if step > 0.0 {
            start = (start / step).floor() * step;
            stop = (stop / step).ceil() * step;
        } else if step < 0.0 {
            start = (start * step).ceil() / step;
            stop = (stop * step).floor() / step;
        } else {
            break;
        }
        previous_step = Some(step);
    }

    // Normalize negative zero
    (start + 0.0, stop + 0.0)
}

/// One histogram bin; `[x0, x1)` except the last, which is closed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub x0: f64,
    pub x1: f64,
    pub count: usize,
}

impl Bin {
    pub fn center(&self) -> f64 {
        (self.x0 + self.x1) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }
}

/// Count `values` into bins split at the tick positions of `domain`.
///
/// Thresholds are the ticks strictly inside the domain. Values outside the
/// domain and NaN values are ignored.
pub fn bin<I>(values: I, domain: (f64, f64), thresholds: usize) -> Vec<Bin>
where
    I: IntoIterator<Item = f64>,
{
    let (x0, x1) = domain;
    if !(x0 <= x1) {
        return Vec::new();
    }

    let cuts: Vec<f64> = ticks(x0, x1, thresholds)
        .into_iter()
        .filter(|&t| t > x0 && t < x1)
        .collect();

    let mut bins: Vec<Bin> = (0..=cuts.len())
        .map(|i| Bin {
            x0: if i == 0 { x0 } else { cuts[i - 1] },
            x1: if i == cuts.len() { x1 } else { cuts[i] },
            count: 0,
        })
        .collect();

    for value in values {
        if value >= x0 && value <= x1 {
            let idx = cuts.partition_point(|&t| t <= value);
            bins[idx].count += 1;
        }
    }

    bins
}

/// Largest bin count, zero for no bins
pub fn max_count(bins: &[Bin]) -> usize {
    bins.iter().map(|b| b.count).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-9)
    }

    #[test]
    fn test_nice_domain() {
        assert_eq!(nice_domain(0.3, 9.7, 10), (0.0, 10.0));
        assert_eq!(nice_domain(0.13, 0.87, 10), (0.1, 0.9));
        assert_eq!(nice_domain(4.12, 5.87, 10), (4.0, 6.0));
        assert_eq!(nice_domain(2.0, 2.0, 10), (2.0, 2.0));
    }

    #[test]
    fn test_ticks() {
        assert!(approx(&ticks(0.0, 1.0, 5), &[0.0, 0.2, 0.4, 0.6, 0.8, 1.0]));
        assert!(approx(&ticks(0.0, 10.0, 10), &(0..=10).map(f64::from).collect::<Vec<_>>()));
        assert!(approx(&ticks(1.0, 0.0, 2), &[1.0, 0.5, 0.0]));
        assert_eq!(ticks(3.0, 3.0, 5), vec![3.0]);
        assert!(ticks(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_bins_cover_domain() {
        let values = [0.0, 0.5, 1.0, 1.5, 2.0, 9.9, 10.0];
        let bins = bin(values, (0.0, 10.0), 10);

        assert_eq!(bins.len(), 10);
        assert_eq!(bins[0].x0, 0.0);
        assert_eq!(bins[9].x1, 10.0);
        assert!(bins.windows(2).all(|w| w[0].x1 == w[1].x0));

        let total: usize = bins.iter().map(|b| b.count).sum();
        assert_eq!(total, values.len());

        // Values on a threshold go to the right bin, the upper bound is closed
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[1].count, 2);
        assert_eq!(bins[2].count, 1);
        assert_eq!(bins[9].count, 2);
        assert_eq!(max_count(&bins), 2);
    }

    #[test]
    fn test_out_of_domain_values_are_ignored() {
        let bins = bin([-1.0, f64::NAN, 0.25, 11.0], (0.0, 1.0), 4);
        let total: usize = bins.iter().map(|b| b.count).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn test_degenerate_domain() {
        let bins = bin([2.0, 2.0], (2.0, 2.0), 20);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[0].center(), 2.0);
        assert_eq!(bins[0].width(), 0.0);
    }
}
