pub mod crop;
pub mod encode;
