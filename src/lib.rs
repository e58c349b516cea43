//! `ezset`: an in-memory sorted-set engine with exact rational scores.
//!
//! The engine stores named collections of (member, score) pairs and answers
//! ordered queries by rank or score. Scores are arbitrary-precision
//! rationals ([`score::Score`]), never IEEE-754 doubles, so financial
//! quantities and long fractional ranks are neither rounded nor
//! mis-ordered.
//!
//! The crate is layered outside-in:
//! - [`iol::IndexedOrderedList`] is the core: a skip-list spine with
//!   per-level span counters for O(log N) rank↔position translation, a
//!   member→node index for O(1) score lookup, and a back-chain for
//!   predecessor queries.
//! - [`keyspace::Keyspace`] maps string keys to independent, independently
//!   lockable `IndexedOrderedList` instances.
//! - [`command::Command`]/[`command::execute`] is a minimal, non-networked
//!   dispatch surface over a keyspace, handling the 0-based/negative-index
//!   translation a real command protocol would otherwise duplicate per
//!   command.
//!
//! This crate does not implement persistence, replication, cross-process
//! visibility, cursor-style iteration, set algebra, or lexicographic
//! member-range queries; see `DESIGN.md` for the full list of deliberate
//! omissions.

pub mod command;
pub mod config;
pub mod error;
pub mod iol;
pub mod keyspace;
pub mod member;
pub mod rng;
pub mod score;

pub use command::{execute, Command, CommandResult};
pub use config::IolConfig;
pub use error::ScoreParseError;
pub use iol::IndexedOrderedList;
pub use keyspace::Keyspace;
pub use member::Member;
pub use score::Score;
