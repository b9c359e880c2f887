pub mod cleaning;
pub mod data;
pub mod loader;

pub use cleaning::{clean_gamelogs, clean_season_stats};
pub use data::{Dataset, PartitionedWriter};
pub use loader::DatasetLoader;
