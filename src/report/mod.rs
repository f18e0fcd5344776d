pub mod chart;
pub mod markdown;
pub mod pandoc;
pub mod resources;
