use crate::error::Result;
use crate::types::{WindowParams, WindowPolicy, BONE_WINDOW, BRAIN_WINDOW, SUBDURAL_WINDOW};
use ndarray::{stack, Array2, Array3, Axis};

use super::histogram::{HistogramBins, EXPECTED_SHAPE};
use super::{apply_window, min_max_normalize, scale_channel, zero_center};

/// Shared contract of every window policy
///
/// Takes the rescaled slice, the record's own window and the bin table and
/// returns an `(H, W, 3)` image.
pub type PolicyFn = fn(&Array2<f32>, WindowParams, &HistogramBins) -> Result<Array3<f32>>;

impl WindowPolicy {
    /// Strategy implementing this policy
    pub fn strategy(self) -> PolicyFn {
        match self {
            WindowPolicy::RecordWindow => record_window_policy,
            WindowPolicy::Bone => bone_policy,
            WindowPolicy::Histogram => histogram_policy,
        }
    }
}

/// Applies `policy` to a rescaled slice
///
/// Channel order is always brain, subdural, then the policy-specific
/// channel. Each channel is zero-centered on its own mean.
pub fn apply_window_policy(
    image: &Array2<f32>,
    record_window: WindowParams,
    policy: WindowPolicy,
    bins: &HistogramBins,
) -> Result<Array3<f32>> {
    (policy.strategy())(image, record_window, bins)
}

fn brain_channel(image: &Array2<f32>) -> Array2<f32> {
    scale_channel(apply_window(image, BRAIN_WINDOW), 0.0, 80.0)
}

fn subdural_channel(image: &Array2<f32>) -> Array2<f32> {
    scale_channel(apply_window(image, SUBDURAL_WINDOW), -20.0, 200.0)
}

fn record_window_policy(
    image: &Array2<f32>,
    record_window: WindowParams,
    _bins: &HistogramBins,
) -> Result<Array3<f32>> {
    let third = min_max_normalize(apply_window(image, record_window));
    stack_channels(brain_channel(image), subdural_channel(image), third)
}

fn bone_policy(
    image: &Array2<f32>,
    _record_window: WindowParams,
    _bins: &HistogramBins,
) -> Result<Array3<f32>> {
    let third = scale_channel(apply_window(image, BONE_WINDOW), -150.0, 380.0);
    stack_channels(brain_channel(image), subdural_channel(image), third)
}

fn histogram_policy(
    image: &Array2<f32>,
    _record_window: WindowParams,
    bins: &HistogramBins,
) -> Result<Array3<f32>> {
    let equalized = bins.scale(image);
    let third = if equalized.dim() == EXPECTED_SHAPE {
        equalized
    } else {
        apply_window(image, BONE_WINDOW)
    };
    stack_channels(
        brain_channel(image),
        subdural_channel(image),
        min_max_normalize(third),
    )
}

fn stack_channels(
    first: Array2<f32>,
    second: Array2<f32>,
    third: Array2<f32>,
) -> Result<Array3<f32>> {
    let first = zero_center(first);
    let second = zero_center(second);
    let third = zero_center(third);
    Ok(stack(
        Axis(2),
        &[first.view(), second.view(), third.view()],
    )?)
}
