//! Persistence layer.
//!
//! The HTTP layer talks to the store exclusively through the traits in
//! [`traits`]; [`MemoryStore`] is the bundled implementation. Uploaded
//! images go through the separate [`ObjectStore`] seam.

pub mod error;
pub mod memory;
pub mod objects;
pub mod traits;

pub use error::{ErrorContext, StoreError, StoreResult};
pub use memory::MemoryStore;
pub use objects::{MemoryObjectStore, ObjectStore, StoredObject};
pub use traits::{
    EquipmentStore, EventStore, FullStore, MemberStore, PaymentStore, StoreHealth,
};
