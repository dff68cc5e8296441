pub mod config;
pub mod errors;
pub mod load;
pub mod model;
pub mod render;
pub mod report;
pub mod timestamp;
pub mod views;
