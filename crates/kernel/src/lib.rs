//! Campaign kernel: the in-memory project and its records.
//!
//! # Invariants
//! - All mutations go through explicit operations on [`Project`].
//! - Collections are `BTreeMap`s so iteration and serialization order are deterministic.
//! - A mutation bumps `updated_at`; reads never do.

pub mod model;
pub mod project;

pub use model::{Abilities, BankEntry, BankKind, Character, CharacterKind, DataBank, Scene, Session};
pub use project::{KernelError, Project};
