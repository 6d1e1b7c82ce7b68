pub mod color;
pub mod error;
pub mod geom;
pub mod model;
pub mod params;
pub mod report;
pub mod tree;
pub mod validate;
