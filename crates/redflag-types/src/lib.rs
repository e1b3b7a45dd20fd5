pub mod api;
pub mod models;

pub use models::{Aggregate, Behavior, Percentages, Verdict, VoteCategory, Votes};
