pub mod completion;
pub mod refresh;
