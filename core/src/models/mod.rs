pub mod class;
pub mod flight;
pub mod mirror;
pub mod movement;

pub use class::{Class, ClassVec};
pub use flight::{Flight, Phase};
pub use mirror::{MirrorAnomaly, MirrorAnomalyKind, MirrorEvent, MirrorState};
pub use movement::KitMovement;
