mod body;
mod catalog;
pub mod clock;
pub mod paths;
pub mod propagation;
pub mod selection;

pub use body::{AstralBody, BodyID, BodyInfo, BodyKind};
pub use catalog::SystemCatalog;
pub use clock::SimClock;
pub use paths::OrbitPathCache;
