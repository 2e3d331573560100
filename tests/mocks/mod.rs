//! Mock repositories for testing.
//!
//! Use these to observe how services drive storage without a snapshot file.

pub mod mock_contact_repository;

pub use mock_contact_repository::MockContactRepository;
