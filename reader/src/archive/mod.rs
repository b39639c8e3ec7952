//! Random-access resource archives

mod rim;

pub use rim::{Resource, RimFile, DESCRIPTOR_SIZE, SIGNATURE as RIM_SIGNATURE};
