mod headless;
mod traits;

#[cfg(feature = "avian2d")]
pub mod avian;

pub use headless::{HeadlessBackend, HeadlessBackendPlugin, HeadlessBody, HeadlessGravity};
pub use traits::PlatformerPhysicsBackend;

#[cfg(feature = "avian2d")]
pub use avian::Avian2dBackend;
