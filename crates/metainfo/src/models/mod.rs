mod bundle;
mod checksum;
mod component;
mod image;
mod provide;
mod release;
mod require;
mod review;
mod screenshot;

pub use self::bundle::Bundle;
pub use self::checksum::Checksum;
pub use self::component::{Component, ComponentKind, Icon};
pub use self::image::{Image, ImageKind};
pub use self::provide::{Provide, ProvideKind};
pub use self::release::{Release, Urgency};
pub use self::require::{Compare, Require};
pub use self::review::Review;
pub use self::screenshot::Screenshot;
