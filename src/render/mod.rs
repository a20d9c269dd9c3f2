pub mod backend;
pub mod blur;
pub mod composite;
pub mod cpu;
pub mod filters;
pub mod gradient;
pub mod preview;
pub mod shapes;
pub mod text;
