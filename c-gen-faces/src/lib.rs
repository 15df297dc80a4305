pub mod layout;

#[cfg(feature = "generator")]
pub mod generator;
