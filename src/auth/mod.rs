mod credential;
mod manager;
mod store;
mod token;

pub use credential::{Identity, StaticCredentials};
pub use manager::SessionManager;
pub use store::{MemoryStore, SessionStore, StoreError};
pub use token::RandomTokenGenerator;
