//! Chart aggregate: figure geometry, styling and the hover data index.

pub mod data_index;
pub mod entities;
pub mod value_objects;

pub use data_index::*;
pub use entities::*;
pub use value_objects::*;
