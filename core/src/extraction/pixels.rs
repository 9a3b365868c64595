use crate::error::{HemoprepError, Result};
use dicom_object::{FileDicomObject, InMemDicomObject};
use dicom_pixeldata::{ConvertOptions, ModalityLutOption, PixelDecoder};
use ndarray::Array2;
use std::borrow::Cow;

use super::tags::{
    get_u16_value, scalar_value, COLUMNS, PIXEL_REPRESENTATION, RESCALE_INTERCEPT,
    RESCALE_SLOPE, ROWS, SAMPLES_PER_PIXEL,
};

/// Unsigned slices with an intercept below this value are fix-up candidates
pub const FIXUP_INTERCEPT_THRESHOLD: f32 = -100.0;

/// Offset added to stored values by the fix-up
pub const FIXUP_OFFSET: i32 = 1000;

/// 12-bit wrap-around modulus
pub const PIXEL_MODE: i32 = 4096;

/// Intercept written by the fix-up
pub const FIXED_INTERCEPT: f32 = -1000.0;

/// Stored sign convention of the pixel samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelRepresentation {
    Unsigned,
    Signed,
    /// PixelRepresentation tag absent
    Unknown,
}

impl PixelRepresentation {
    /// Maps the DICOM PixelRepresentation value (0 = unsigned)
    pub fn from_value(value: u16) -> Self {
        if value == 0 {
            PixelRepresentation::Unsigned
        } else {
            PixelRepresentation::Signed
        }
    }
}

/// Stored pixel data of one slice together with its calibration
#[derive(Debug, Clone, PartialEq)]
pub struct RawSlice {
    /// Stored values, `Rows x Columns`
    pub pixels: Array2<i32>,

    pub pixel_representation: PixelRepresentation,

    pub rescale_slope: f32,

    pub rescale_intercept: f32,
}

impl RawSlice {
    /// Creates a slice from already decoded values
    pub fn new(
        pixels: Array2<i32>,
        pixel_representation: PixelRepresentation,
        rescale_slope: f32,
        rescale_intercept: f32,
    ) -> Self {
        Self {
            pixels,
            pixel_representation,
            rescale_slope,
            rescale_intercept,
        }
    }

    /// Decodes the first frame of a DICOM file object
    ///
    /// Values are the stored samples; no modality LUT is applied.
    ///
    /// # Errors
    ///
    /// Any failure to turn PixelData into a `Rows x Columns` array is
    /// reported as `MalformedPixelData`. Missing rescale tags are reported
    /// as `TagNotFound`.
    pub fn from_dicom(obj: &FileDicomObject<InMemDicomObject>) -> Result<Self> {
        let samples = get_u16_value(obj, SAMPLES_PER_PIXEL).unwrap_or(1);
        if samples != 1 {
            return Err(HemoprepError::MalformedPixelData(format!(
                "expected 1 sample per pixel, found {}",
                samples
            )));
        }
        let (rows, columns) = match (get_u16_value(obj, ROWS), get_u16_value(obj, COLUMNS)) {
            (Some(rows), Some(columns)) => (rows as usize, columns as usize),
            _ => {
                return Err(HemoprepError::MalformedPixelData(
                    "Rows or Columns missing".to_string(),
                ))
            }
        };

        let decoded = obj
            .decode_pixel_data()
            .map_err(|e| HemoprepError::MalformedPixelData(format!("{}", e)))?;
        let options = ConvertOptions::new().with_modality_lut(ModalityLutOption::None);
        let values = decoded
            .to_ndarray_with_options::<f32>(&options)
            .map_err(|e| HemoprepError::MalformedPixelData(format!("{}", e)))?
            .into_raw_vec();

        let area = rows * columns;
        if area == 0 || values.len() < area {
            return Err(HemoprepError::MalformedPixelData(format!(
                "expected {}x{} samples, found {}",
                rows,
                columns,
                values.len()
            )));
        }

        let stored: Vec<i32> = values[..area].iter().map(|&v| v as i32).collect();
        let pixels = Array2::from_shape_vec((rows, columns), stored)?;

        let representation = get_u16_value(obj, PIXEL_REPRESENTATION)
            .map(PixelRepresentation::from_value)
            .unwrap_or(PixelRepresentation::Unknown);

        Ok(Self::new(
            pixels,
            representation,
            scalar_value::<f32>(obj, RESCALE_SLOPE)?,
            scalar_value::<f32>(obj, RESCALE_INTERCEPT)?,
        ))
    }

    /// Stored values as floats
    pub fn to_f32(&self) -> Array2<f32> {
        self.pixels.mapv(|v| v as f32)
    }
}

/// Corrects slices stored as unsigned with a mis-encoded intercept
///
/// Slices that are not known to be unsigned, or whose intercept is not below
/// [`FIXUP_INTERCEPT_THRESHOLD`], are returned borrowed and untouched.
/// Otherwise every stored value is offset by [`FIXUP_OFFSET`], values that
/// reach [`PIXEL_MODE`] wrap around once, and the intercept of the
/// returned copy becomes [`FIXED_INTERCEPT`].
pub fn fix_pixel_representation(slice: &RawSlice) -> Cow<'_, RawSlice> {
    if slice.pixel_representation != PixelRepresentation::Unsigned
        || slice.rescale_intercept >= FIXUP_INTERCEPT_THRESHOLD
    {
        return Cow::Borrowed(slice);
    }

    let pixels = slice.pixels.mapv(|v| {
        let shifted = v + FIXUP_OFFSET;
        if shifted >= PIXEL_MODE {
            shifted - PIXEL_MODE
        } else {
            shifted
        }
    });

    Cow::Owned(RawSlice {
        pixels,
        pixel_representation: slice.pixel_representation,
        rescale_slope: slice.rescale_slope,
        rescale_intercept: FIXED_INTERCEPT,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn slice(repr: PixelRepresentation, intercept: f32) -> RawSlice {
        RawSlice::new(array![[0, 1500], [3095, 3096]], repr, 1.0, intercept)
    }

    #[test]
    fn test_pixel_representation_from_value() {
        assert_eq!(PixelRepresentation::from_value(0), PixelRepresentation::Unsigned);
        assert_eq!(PixelRepresentation::from_value(1), PixelRepresentation::Signed);
    }

    #[test]
    fn test_fixup_noop_when_signed() {
        let raw = slice(PixelRepresentation::Signed, -1024.0);
        let fixed = fix_pixel_representation(&raw);
        assert!(matches!(fixed, Cow::Borrowed(_)));
        assert_eq!(*fixed, raw);
    }

    #[test]
    fn test_fixup_noop_when_representation_unknown() {
        let raw = slice(PixelRepresentation::Unknown, -1024.0);
        let fixed = fix_pixel_representation(&raw);
        assert!(matches!(fixed, Cow::Borrowed(_)));
        assert_eq!(fixed.rescale_intercept, -1024.0);
    }

    #[test]
    fn test_fixup_noop_when_intercept_not_below_threshold() {
        for intercept in [0.0, -100.0, 50.0] {
            let raw = slice(PixelRepresentation::Unsigned, intercept);
            let fixed = fix_pixel_representation(&raw);
            assert!(matches!(fixed, Cow::Borrowed(_)));
            assert_eq!(fixed.rescale_intercept, intercept);
            assert_eq!(fixed.pixels, raw.pixels);
        }
    }

    #[test]
    fn test_fixup_offsets_and_wraps() {
        let raw = slice(PixelRepresentation::Unsigned, -1024.0);
        let fixed = fix_pixel_representation(&raw);

        assert!(matches!(fixed, Cow::Owned(_)));
        assert_eq!(fixed.pixels, array![[1000, 2500], [4095, 0]]);
        assert_eq!(fixed.rescale_intercept, -1000.0);
        assert_eq!(fixed.rescale_slope, 1.0);

        // source slice is left as it was
        assert_eq!(raw.pixels, array![[0, 1500], [3095, 3096]]);
        assert_eq!(raw.rescale_intercept, -1024.0);
    }

    #[test]
    fn test_to_f32() {
        let raw = slice(PixelRepresentation::Unsigned, 0.0);
        assert_eq!(raw.to_f32(), array![[0.0, 1500.0], [3095.0, 3096.0]]);
    }
}
