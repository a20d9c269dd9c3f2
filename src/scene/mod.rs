pub mod elements;
pub mod model;
pub mod patch;
pub mod snapshot;
pub mod theme;
