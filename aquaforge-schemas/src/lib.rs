pub mod bloom;
pub mod settings;
pub mod water;
