use crate::error::{HemoprepError, Result};
use dicom_core::Tag;
use dicom_object::InMemDicomObject;

// Core Image Tags
pub const MODALITY: Tag = Tag(0x0008, 0x0060);
pub const SAMPLES_PER_PIXEL: Tag = Tag(0x0028, 0x0002);

// Image Geometry Tags
pub const ROWS: Tag = Tag(0x0028, 0x0010);
pub const COLUMNS: Tag = Tag(0x0028, 0x0011);
pub const PIXEL_REPRESENTATION: Tag = Tag(0x0028, 0x0103);
pub const PIXEL_DATA: Tag = Tag(0x7FE0, 0x0010);

// Rescale and VOI Tags
pub const WINDOW_CENTER: Tag = Tag(0x0028, 0x1050);
pub const WINDOW_WIDTH: Tag = Tag(0x0028, 0x1051);
pub const RESCALE_INTERCEPT: Tag = Tag(0x0028, 0x1052);
pub const RESCALE_SLOPE: Tag = Tag(0x0028, 0x1053);

// Study/Series Identification Tags
pub const PATIENT_ID: Tag = Tag(0x0010, 0x0020);
pub const STUDY_INSTANCE_UID: Tag = Tag(0x0020, 0x000D);
pub const SERIES_INSTANCE_UID: Tag = Tag(0x0020, 0x000E);
pub const SOP_INSTANCE_UID: Tag = Tag(0x0008, 0x0018);

/// Numeric conversion applied to the first value of a DICOM field
pub trait ScalarCast: Sized {
    fn cast(value: f64) -> Self;
}

impl ScalarCast for i32 {
    /// Truncates toward zero
    fn cast(value: f64) -> Self {
        value.trunc() as i32
    }
}

impl ScalarCast for i64 {
    fn cast(value: f64) -> Self {
        value.trunc() as i64
    }
}

impl ScalarCast for f32 {
    fn cast(value: f64) -> Self {
        value as f32
    }
}

impl ScalarCast for f64 {
    fn cast(value: f64) -> Self {
        value
    }
}

/// Reads a numeric field that may be single- or multi-valued
///
/// Multi-valued fields (e.g. `WindowCenter = 40\50`) yield their first
/// value; single values are cast directly.
///
/// # Errors
///
/// Returns `TagNotFound` when the tag is absent and `InvalidValue` when it
/// is empty or not numeric.
pub fn scalar_value<T: ScalarCast>(dcm: &InMemDicomObject, tag: Tag) -> Result<T> {
    let elem = dcm
        .element(tag)
        .map_err(|_| HemoprepError::TagNotFound(format!("{}", tag)))?;
    let values = elem.to_multi_float64()?;
    values
        .first()
        .map(|v| T::cast(*v))
        .ok_or_else(|| HemoprepError::InvalidValue(format!("{} has no value", tag)))
}

/// Reads a string field, failing if it is absent
pub fn required_string(dcm: &InMemDicomObject, tag: Tag) -> Result<String> {
    get_string_value(dcm, tag).ok_or_else(|| HemoprepError::TagNotFound(format!("{}", tag)))
}

/// Helper to get string value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to string
pub fn get_string_value(dcm: &InMemDicomObject, tag: Tag) -> Option<String> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_str().ok())
        .map(|s| s.trim().to_string())
}

/// Helper to get u16 value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to u16
pub fn get_u16_value(dcm: &InMemDicomObject, tag: Tag) -> Option<u16> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_int::<u16>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom_core::value::PrimitiveValue;
    use dicom_core::{DataElement, VR};

    fn dcm_with(tag: Tag, vr: VR, value: PrimitiveValue) -> InMemDicomObject {
        InMemDicomObject::from_element_iter([DataElement::new(tag, vr, value)])
    }

    #[test]
    fn test_tag_values() {
        assert_eq!(WINDOW_CENTER, Tag(0x0028, 0x1050));
        assert_eq!(RESCALE_SLOPE, Tag(0x0028, 0x1053));
        assert_eq!(PIXEL_REPRESENTATION, Tag(0x0028, 0x0103));
        assert_eq!(PIXEL_DATA, Tag(0x7FE0, 0x0010));
    }

    #[test]
    fn test_scalar_value_single() {
        let dcm = dcm_with(WINDOW_CENTER, VR::DS, PrimitiveValue::from("40"));
        assert_eq!(scalar_value::<i32>(&dcm, WINDOW_CENTER).unwrap(), 40);
        assert_eq!(scalar_value::<f32>(&dcm, WINDOW_CENTER).unwrap(), 40.0);
    }

    #[test]
    fn test_scalar_value_multi_takes_first() {
        let dcm = dcm_with(
            WINDOW_WIDTH,
            VR::DS,
            PrimitiveValue::Strs(vec!["80".to_string(), "150".to_string()].into()),
        );
        assert_eq!(scalar_value::<i32>(&dcm, WINDOW_WIDTH).unwrap(), 80);
    }

    #[test]
    fn test_scalar_value_int_cast_truncates() {
        let dcm = dcm_with(WINDOW_CENTER, VR::DS, PrimitiveValue::from("36.7"));
        assert_eq!(scalar_value::<i32>(&dcm, WINDOW_CENTER).unwrap(), 36);

        let dcm = dcm_with(WINDOW_CENTER, VR::DS, PrimitiveValue::from("-36.7"));
        assert_eq!(scalar_value::<i32>(&dcm, WINDOW_CENTER).unwrap(), -36);
    }

    #[test]
    fn test_scalar_value_missing_tag() {
        let dcm = InMemDicomObject::new_empty();
        assert!(matches!(
            scalar_value::<f64>(&dcm, RESCALE_SLOPE),
            Err(HemoprepError::TagNotFound(_))
        ));
    }

    #[test]
    fn test_scalar_value_not_numeric() {
        let dcm = dcm_with(RESCALE_SLOPE, VR::DS, PrimitiveValue::from("abc"));
        assert!(matches!(
            scalar_value::<f64>(&dcm, RESCALE_SLOPE),
            Err(HemoprepError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_required_string() {
        let dcm = dcm_with(PATIENT_ID, VR::LO, PrimitiveValue::from("ID_6c8a3a75 "));
        assert_eq!(required_string(&dcm, PATIENT_ID).unwrap(), "ID_6c8a3a75");
        assert!(matches!(
            required_string(&dcm, STUDY_INSTANCE_UID),
            Err(HemoprepError::TagNotFound(_))
        ));
    }
}
