pub mod integrity;
pub mod registry;
pub mod ritual;
pub mod root;

pub use integrity::*;
pub use registry::*;
pub use ritual::*;
pub use root::*;
