pub mod timeline;

pub use timeline::*;
