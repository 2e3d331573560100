mod memory_contact_repository;
mod memory_user_repository;
pub mod snapshot;
mod traits;

pub use memory_contact_repository::InMemoryContactRepository;
pub use memory_user_repository::InMemoryUserRepository;
pub use snapshot::SnapshotFile;
pub use traits::{ContactRepository, UserRepository};
