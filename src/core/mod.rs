pub mod store;
pub mod transform;
pub mod validators;

pub use crate::domain::model::{ChainMap, ChainMetadata, ChainWarpRoutes, WarpRoute};
pub use crate::domain::ports::{ConfigProvider, RegistrySource, ValidatorSource};
pub use crate::utils::error::Result;
