pub mod profile;
pub mod qdrant;

mod error;

pub use error::Error;
pub use profile::ProfileStore;
pub use qdrant::QdrantStore;

pub type Result<T, E = Error> = std::result::Result<T, E>;
