//! Core of the Sistema Escolar admin panel: a mock-authenticated session
//! gate ([`SessionStore`]) and a student-records repository
//! ([`StudentRepository`]), both persisted to a string-keyed durable store
//! ([`Storage`]) the way a browser page persists to local storage.
//!
//! The presentation layer is a collaborator, not part of this crate: it
//! feeds raw form input into these stores and renders what comes back,
//! surfacing any [`Error`] as a user-facing message.
//!
//! Known accepted limitation: two independently opened store instances on
//! the same backing storage (the analog of two browser tabs on one
//! profile) do not coordinate. Each holds its own in-memory copy and the
//! last one to write wins. This is documented behavior, not a defect.

pub mod err;
pub mod models;
pub mod session;
pub mod storage;
pub mod students;

pub use err::Error;
pub use models::{Principal, Role, Student, StudentInput};
pub use session::{Authenticator, MockAuthenticator, SessionStore};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use students::StudentRepository;
