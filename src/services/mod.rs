pub mod import_service;
pub mod raw_material_service;

pub use import_service::*;
pub use raw_material_service::*;
