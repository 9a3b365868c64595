//! Intensity transforms on a single 2D slice
//!
//! Everything here is pure: inputs are borrowed and a new array is returned.

mod histogram;
mod policy;

pub use histogram::{HistogramBins, EXPECTED_SHAPE};
pub use policy::{apply_window_policy, PolicyFn};

use crate::types::WindowParams;
use ndarray::Array2;

/// Converts stored values to Hounsfield units: `image * slope + intercept`
pub fn rescale_image(image: &Array2<f32>, slope: f32, intercept: f32) -> Array2<f32> {
    image.mapv(|v| v * slope + intercept)
}

/// Clips a copy of `image` to the window bounds
///
/// The bounds come from [`WindowParams::lower_bound`] and
/// [`WindowParams::upper_bound`], which floor the half-width.
pub fn apply_window(image: &Array2<f32>, window: WindowParams) -> Array2<f32> {
    let lower = window.lower_bound();
    let upper = window.upper_bound();
    image.mapv(|v| {
        if v < lower {
            lower
        } else if v > upper {
            upper
        } else {
            v
        }
    })
}

/// `(channel - offset) / scale`
pub(crate) fn scale_channel(channel: Array2<f32>, offset: f32, scale: f32) -> Array2<f32> {
    channel.mapv_into(|v| (v - offset) / scale)
}

/// Rescales a channel onto `[0, 1]` using its own min and max
///
/// A constant channel becomes all zeros.
pub(crate) fn min_max_normalize(channel: Array2<f32>) -> Array2<f32> {
    let (min, max) = channel
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;
    if range <= 0.0 || !range.is_finite() {
        return channel.mapv_into(|_| 0.0);
    }
    channel.mapv_into(|v| (v - min) / range)
}

/// Subtracts the channel's own mean
pub(crate) fn zero_center(channel: Array2<f32>) -> Array2<f32> {
    let mean = channel.mean().unwrap_or(0.0);
    channel.mapv_into(|v| v - mean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_rescale_identity() {
        let image = array![[-5.0, 0.0], [12.0, 4095.0]];
        assert_eq!(rescale_image(&image, 1.0, 0.0), image);
    }

    #[test]
    fn test_rescale_linear() {
        let image = array![[0.0, 10.0], [1024.0, 2048.0]];
        let out = rescale_image(&image, 2.0, -1024.0);
        assert_eq!(out, array![[-1024.0, -1004.0], [1024.0, 3072.0]]);
    }

    #[test]
    fn test_window_clips_and_preserves_interior() {
        let image = array![[-1000.0, 0.0, 39.5], [80.0, 80.5, 3000.0]];
        let out = apply_window(&image, WindowParams::new(40.0, 80.0));

        assert_eq!(out, array![[0.0, 0.0, 39.5], [80.0, 80.0, 80.0]]);
        // input untouched
        assert_eq!(image[[0, 0]], -1000.0);
        assert_eq!(image[[1, 2]], 3000.0);
    }

    #[test]
    fn test_window_floors_odd_width() {
        let image = array![[-100.0, 100.0]];
        let out = apply_window(&image, WindowParams::new(0.0, 75.0));
        assert_eq!(out, array![[-37.0, 37.0]]);
    }

    #[test]
    fn test_window_output_within_bounds() {
        let image = Array2::from_shape_fn((16, 16), |(r, c)| (r as f32 * 97.0) - (c as f32 * 53.0));
        for (center, width) in [(40.0, 80.0), (80.0, 200.0), (-600.0, 1500.0), (0.0, 1.0)] {
            let window = WindowParams::new(center, width);
            let out = apply_window(&image, window);
            assert!(out
                .iter()
                .all(|&v| v >= window.lower_bound() && v <= window.upper_bound()));
        }
    }

    #[test]
    fn test_min_max_normalize() {
        let out = min_max_normalize(array![[10.0, 20.0], [30.0, 50.0]]);
        assert_eq!(out, array![[0.0, 0.25], [0.5, 1.0]]);
    }

    #[test]
    fn test_min_max_normalize_constant_channel() {
        let out = min_max_normalize(Array2::from_elem((3, 3), 7.0));
        assert!(out.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_zero_center() {
        let out = zero_center(array![[1.0, 2.0], [3.0, 6.0]]);
        assert_eq!(out, array![[-2.0, -1.0], [0.0, 3.0]]);
        assert_eq!(out.sum(), 0.0);
    }

    #[test]
    fn test_scale_channel() {
        let out = scale_channel(array![[-20.0, 180.0]], -20.0, 200.0);
        assert_eq!(out, array![[0.0, 1.0]]);
    }
}
