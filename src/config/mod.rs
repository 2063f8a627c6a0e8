//! Statutory configuration: typed payloads, YAML loading and tiered,
//! effective-dated resolution.

mod loader;
mod resolver;
mod types;

pub use loader::ConfigLoader;
pub use resolver::ConfigSet;
pub use types::{
    EsiConfig, LwfConfig, PfConfig, PtConfig, PtSlab, StatutoryConfig, StatutoryPayload,
    StatutoryType,
};
