pub use crate::vfile::VFile;
