//! Student roster storage for Chalkboard.
//!
//! A small CRUD surface over students and their quiz results, behind one
//! storage capability trait with two interchangeable backends: a seeded
//! in-memory store for prototyping and a filesystem document store. The
//! backend is selected once from configuration, never by conditionals in
//! callers.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod document;
mod memory;
mod store;
mod student;

pub use document::DocumentRoster;
pub use memory::MemoryRoster;
pub use store::{RosterStore, open_roster};
pub use student::{QuizResult, Student, StudentStatus, StudentSummary, summarize};
