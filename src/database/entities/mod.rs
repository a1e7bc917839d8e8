pub mod raw_materials;

pub use raw_materials::*;
