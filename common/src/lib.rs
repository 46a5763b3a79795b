pub mod prelude;
pub mod vfile;
