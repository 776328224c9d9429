//! Data models for the application, each with the queries it needs.

mod common;
mod file;
mod quick_note;
mod user;

pub use common::Model;
pub use file::File;
pub use quick_note::{QuickNote, QuickNoteInput};
pub use user::User;
