//! Query creator domain: filters, the port they travel in and the
//! parameters handed to query execution

pub mod execution;
pub mod filters;
pub mod port;

pub use execution::{QueryFilter, QueryParameters, ServiceValueType, ensure_source_file};
pub use port::{MetadataQueryPort, PortError};
