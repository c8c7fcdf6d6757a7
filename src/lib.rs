pub mod astro;
pub mod camera;
pub mod config;
pub mod error;
pub mod file;
pub mod gui;
pub mod math;
pub mod model;
pub mod simulation;

pub use error::{Error, Result};
