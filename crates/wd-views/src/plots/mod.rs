//! Plot helpers shared by the views

pub mod binning;
pub mod brush;
pub mod palette;

pub use binning::{bin, nice_domain, ticks, Bin};
pub use brush::BrushTracker;
pub use hit_test::{nearest_within, HIT_RADIUS};
pub use palette::{condition_color, emphasize, marker_shape, profile_color};

/// Minimum and maximum of the finite values, if any
pub fn finite_extent<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
