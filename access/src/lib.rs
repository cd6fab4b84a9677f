//! Session gating and backend contract shared by the browser and terminal clients.
//!
//! This crate owns everything that decides *whether* a view may render and
//! *how* the document backend is spoken to, without committing to a runtime:
//! no HTTP client, no async executor, no browser bindings. The `client`
//! crate plugs in `gloo-net` and `localStorage`; the `fileshare` CLI plugs in
//! `reqwest` and a JSON session file.
//!
//! DESIGN
//! ======
//! The route guard is a pure function of `(loading, session, policy)`.
//! Navigation is a separate side effect behind [`guard::Navigator`] so the
//! decision logic is testable without a rendering environment. Session state
//! has a single owner ([`provider::AuthProvider`]) with two mutators
//! (login/logout) and snapshot readers.

pub mod api;
pub mod guard;
pub mod notice;
pub mod provider;
pub mod session;
pub mod store;

pub use api::{ApiError, Credentials, DocumentKind, DocumentRecord, LoginResponse};
pub use guard::{Decision, GuardPolicy, GuardState, Navigator, Route};
pub use notice::{Notice, NoticeKind};
pub use provider::{AuthBackend, AuthError, AuthProvider, AuthSnapshot};
pub use session::{Role, Session, UserProfile};
pub use store::{MemoryStorage, SessionStorage, SessionStore, StorageError};
