pub mod automobile_repo;
pub mod errors;
pub mod memory_repo;
pub mod store;

pub use automobile_repo::AutomobileRepository;
pub use errors::StoreError;
pub use memory_repo::InMemoryAutomobileRepository;
pub use store::{AutomobileStore, PageRequest, SharedStore};
