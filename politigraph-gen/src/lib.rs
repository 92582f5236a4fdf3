//! politigraph-gen library
//!
//! Fetches legislators and roll-call votes from the politigraph GraphQL
//! API and derives the four flat tables used by the province vote map:
//! person, person vote summary, per-province fact, and vote detail.

pub mod client;
pub mod error;
pub mod fact;
pub mod fetcher;
pub mod labels;
pub mod model;
pub mod normalize;
pub mod person;
pub mod person_vote;
pub mod pipeline;
pub mod term;
pub mod vote_detail;
pub mod votes;
pub mod writer;

pub use crate::error::{GenError, GenResult};
pub use crate::pipeline::{run, run_remote, transform, GeneratedTables, RunSummary};
