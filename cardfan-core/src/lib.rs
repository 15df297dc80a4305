pub mod card;
pub mod config;
pub mod drop_zone;
pub mod fan;
pub mod scheduler;
pub mod table;
pub mod tween;

pub use card::{Card, CardId, CardTick, STAT_MAX, STAT_MIN, STAT_RANDOM_MIN, StatKind, StatValue};
pub use config::{ConfigError, TableConfig};
pub use drop_zone::{DropZone, DropZoneConfig};
pub use fan::{FanConfig, Pose, cubic_bezier};
pub use fastrand::Rng;
pub use glam::Vec2;
pub use scheduler::{FrameHandler, FrameScheduler, HandlerId};
pub use table::Table;
pub use tween::{Lerp, Transition};
