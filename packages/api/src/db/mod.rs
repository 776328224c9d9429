//! # Database module: SQLite connection pool management
//!
//! The pool is created once at startup by [`connect`] and handed to the router
//! inside [`crate::AppState`]; nothing here is process-global.
//!
//! [`connect`] opens the database file named by `DB_PATH` in WAL mode with a
//! busy timeout, then runs the embedded migrations, which create the `users`,
//! `files` and `quick_notes` tables. `users.username` and `quick_notes.path`
//! carry unique indexes over live (non-deleted) rows.

mod pool;

pub use pool::{connect, connect_in_memory, migrate};
