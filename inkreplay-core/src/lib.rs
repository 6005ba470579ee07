pub mod brush;
pub mod document;
pub mod id;
pub mod layer;
pub mod settings;
pub mod software;
pub mod stroke;
pub mod surface;
pub mod util;

#[cfg(test)]
mod test_util;

pub use document::Document;
pub use layer::{Layer, Plan, Strategy};
pub use settings::CacheSettings;
pub use stroke::{Stroke, StrokeRef};
