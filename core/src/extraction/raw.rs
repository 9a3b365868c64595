use dicom_core::dictionary::{DataDictionary, DataDictionaryEntry, TagRange};
use dicom_core::VR;
use dicom_dictionary_std::StandardDataDictionary;
use dicom_object::InMemDicomObject;
use serde::Serialize;
use std::collections::BTreeMap;

use super::tags::PIXEL_DATA;

/// One attribute value as reported by [`dicom_raw`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    Single(String),
    Multi(Vec<String>),
    /// Binary payload, reported by byte length
    Binary { bytes: usize },
    /// Sequence, reported by item count
    Sequence { items: usize },
}

/// Dumps every standard top-level attribute except PixelData
///
/// Keys are dictionary keywords (`WindowCenter`, `PatientID`, ...).
/// Private, unknown and range-matched tags (repeating groups, private
/// creators) are left out.
pub fn dicom_raw(dcm: &InMemDicomObject) -> BTreeMap<String, RawValue> {
    let mut raw = BTreeMap::new();

    for elem in dcm.iter() {
        let tag = elem.header().tag;
        if tag == PIXEL_DATA || tag.group() % 2 == 1 {
            continue;
        }
        let keyword = match StandardDataDictionary.by_tag(tag) {
            Some(entry) if matches!(entry.tag_range(), TagRange::Single(_)) => {
                entry.alias().to_string()
            }
            _ => continue,
        };

        let value = if let Some(items) = elem.items() {
            RawValue::Sequence { items: items.len() }
        } else if let Some(primitive) = elem.value().primitive() {
            match elem.vr() {
                VR::OB | VR::OW | VR::OF | VR::OD | VR::OL | VR::UN => RawValue::Binary {
                    bytes: primitive.to_bytes().len(),
                },
                _ if primitive.multiplicity() > 1 => RawValue::Multi(
                    primitive
                        .to_multi_str()
                        .iter()
                        .map(|s| s.trim().to_string())
                        .collect(),
                ),
                _ => RawValue::Single(primitive.to_str().trim().to_string()),
            }
        } else {
            continue;
        };

        raw.insert(keyword, value);
    }

    raw
}
