//! Repository Layer
//!
//! Data access abstractions and implementations.

mod traits;
mod memory;
mod db;
mod period_repo;
mod session_repo;


pub use traits::{PeriodMemory, SessionStore, StoredSession};
pub use memory::{InMemoryPeriodMemory, InMemorySessionStore};
pub use db::{init_db, DbState, SharedConnection};
pub use period_repo::SqlitePeriodMemory;
pub use session_repo::{SessionRepository, SORT_OPTION_KEY};
