//! Domain core for the red flag voting service: tallies, the catalog over a
//! behavior store, unseen-item selection, and the client-side explore and
//! judge state machines.

pub mod aggregate;
pub mod catalog;
pub mod cursor;
pub mod error;
pub mod explore;
pub mod judge;
pub mod ranking;
pub mod selector;
pub mod store;

pub use aggregate::aggregate;
pub use catalog::{Catalog, CatalogConfig, Page};
pub use error::{Error, Result};
pub use ranking::VerdictRule;
pub use selector::Selection;
pub use store::BehaviorStore;
