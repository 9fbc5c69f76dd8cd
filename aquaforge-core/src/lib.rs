pub mod batch;
pub mod bloom;
pub mod content;
pub mod detection;
pub mod error;
pub mod water_quality;
