mod bbox;
mod rect;
mod validate;

pub(crate) use bbox::{aabb, BoundingBox};
pub use rect::{Rectangle, MAX_LNG_SPAN};
pub use validate::{validate, GeometryError, RawGeometry};
