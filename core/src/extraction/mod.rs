pub mod pixels;
pub mod raw;
pub mod tags;

pub use pixels::{fix_pixel_representation, PixelRepresentation, RawSlice};
pub use raw::{dicom_raw, RawValue};
pub use tags::*;
