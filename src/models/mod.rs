pub mod image_record;
pub mod record_store;
pub mod scene_summary;

pub use image_record::*;
pub use record_store::*;
pub use scene_summary::*;
