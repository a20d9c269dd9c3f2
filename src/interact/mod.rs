pub mod controller;
pub mod hit;
pub mod mapper;
