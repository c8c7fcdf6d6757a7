pub mod orbit;

pub use orbit::{Orbit, DEFAULT_PATH_SEGMENTS};
