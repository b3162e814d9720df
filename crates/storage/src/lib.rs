//! SQLite-backed storage for the Rekaliber chat service.
//!
//! This crate owns the conversational log (users, conversations, messages)
//! and the property catalogue the data tools query. Message history is
//! append-only: the chat loop only ever adds messages, it never rewrites
//! them.
//!
//! # Overview
//!
//! The [`ChatStore`] wraps a single SQLite database and exposes plain CRUD
//! operations:
//!
//! 1. **Users** — looked up (or lazily created) by email.
//! 2. **Conversations** — owned by a user, deleted with cascade onto their
//!    messages, stamped with creation and last-activity times.
//! 3. **Messages** — role-tagged (`usuario`, `asistente`, `sistema`),
//!    appended in order; appending touches the parent conversation.
//! 4. **Properties** — the real-estate catalogue searched and counted by
//!    the `buscar_propiedades` / `contar_propiedades` tools.
//!
//! The store is safe to share across request handlers: access is
//! serialized through an internal mutex, and the schema is created on
//! open.
//!
//! # Example
//!
//! ```no_run
//! use storage::{ChatStore, Role};
//!
//! let store = ChatStore::open("data/propiedades.db")?;
//! store.seed_demo_data()?;
//!
//! let user = store.get_or_create_user("Usuario Demo", "demo@example.com")?;
//! let conversation = store.create_conversation(user, Some("Hola"))?;
//! store.append_message(conversation, Role::User, "Hola")?;
//!
//! for message in store.list_messages(conversation, None)? {
//!     println!("{}: {}", message.rol.as_str(), message.contenido);
//! }
//! # Ok::<(), storage::Error>(())
//! ```

mod error;
mod store;
mod types;

pub use error::{Error, Result};
pub use store::{ChatStore, DEMO_USER_EMAIL, DEMO_USER_NAME};
pub use types::{
    Conversation, Property, PropertyCount, PropertyFilter, Role, StoredMessage, User,
};
