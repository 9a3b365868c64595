use crate::error::Result;
use crate::extraction::tags::{
    get_string_value, required_string, scalar_value, MODALITY, PATIENT_ID, RESCALE_INTERCEPT,
    RESCALE_SLOPE, SERIES_INSTANCE_UID, SOP_INSTANCE_UID, STUDY_INSTANCE_UID, WINDOW_CENTER,
    WINDOW_WIDTH,
};
use crate::types::WindowParams;
use dicom_object::InMemDicomObject;
use serde::Serialize;

/// Main extractor for per-slice record metadata
///
/// Normalizes the identifying, VOI and rescale fields of a CT slice into
/// typed scalars. Multi-valued window fields contribute their first value.
///
/// # Example
///
/// ```
/// use hemoprep_core::MetadataExtractor;
/// use dicom_object::InMemDicomObject;
/// use dicom_core::{DataElement, PrimitiveValue, VR, Tag};
///
/// let mut dcm = InMemDicomObject::new_empty();
/// dcm.put(DataElement::new(Tag(0x0010, 0x0020), VR::LO, PrimitiveValue::from("ID_5f8b6a")));
/// dcm.put(DataElement::new(Tag(0x0020, 0x000D), VR::UI, PrimitiveValue::from("1.2.3")));
/// dcm.put(DataElement::new(Tag(0x0020, 0x000E), VR::UI, PrimitiveValue::from("1.2.3.4")));
/// dcm.put(DataElement::new(
///     Tag(0x0028, 0x1050), // WindowCenter
///     VR::DS,
///     PrimitiveValue::Strs(vec!["36".to_string(), "40".to_string()].into()),
/// ));
/// dcm.put(DataElement::new(Tag(0x0028, 0x1051), VR::DS, PrimitiveValue::from("80")));
/// dcm.put(DataElement::new(Tag(0x0028, 0x1052), VR::DS, PrimitiveValue::from("-1024")));
/// dcm.put(DataElement::new(Tag(0x0028, 0x1053), VR::DS, PrimitiveValue::from("1")));
///
/// let metadata = MetadataExtractor::extract(&dcm).unwrap();
///
/// assert_eq!(metadata.patient_id, "ID_5f8b6a");
/// assert_eq!(metadata.window_center, 36);
/// assert_eq!(metadata.window_width, 80);
/// assert_eq!(metadata.rescale_intercept, -1024.0);
/// ```
pub struct MetadataExtractor;

impl MetadataExtractor {
    /// Extracts record metadata from a DICOM object
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Patient, study or series identifiers are missing
    /// - Window or rescale fields are missing or not numeric
    pub fn extract(dcm: &InMemDicomObject) -> Result<RecordMetadata> {
        Ok(RecordMetadata {
            patient_id: required_string(dcm, PATIENT_ID)?,
            study_instance_uid: required_string(dcm, STUDY_INSTANCE_UID)?,
            series_instance_uid: required_string(dcm, SERIES_INSTANCE_UID)?,
            sop_instance_uid: get_string_value(dcm, SOP_INSTANCE_UID),
            modality: get_string_value(dcm, MODALITY),
            window_width: scalar_value(dcm, WINDOW_WIDTH)?,
            window_center: scalar_value(dcm, WINDOW_CENTER)?,
            rescale_intercept: scalar_value(dcm, RESCALE_INTERCEPT)?,
            rescale_slope: scalar_value(dcm, RESCALE_SLOPE)?,
        })
    }
}

/// Typed metadata of one CT slice
///
/// Identifiers are opaque grouping keys. A fresh value is built on every
/// extraction; nothing caches or shares it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordMetadata {
    pub patient_id: String,

    pub study_instance_uid: String,

    pub series_instance_uid: String,

    pub sop_instance_uid: Option<String>,

    pub modality: Option<String>,

    /// First WindowWidth value, truncated to an integer
    pub window_width: i32,

    /// First WindowCenter value, truncated to an integer
    pub window_center: i32,

    pub rescale_intercept: f32,

    pub rescale_slope: f32,
}

impl RecordMetadata {
    /// The slice's own display window
    pub fn window(&self) -> WindowParams {
        WindowParams::new(self.window_center as f32, self.window_width as f32)
    }
}
