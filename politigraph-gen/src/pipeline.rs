//! End-to-end generation run
//!
//! Strictly sequential: fetch people, fetch vote events, build every
//! table, then write. Nothing is written unless every earlier step
//! succeeded.

use crate::client::{GraphQlClient, PEOPLE_KEY, PEOPLE_QUERY, VOTE_EVENTS_KEY, VOTE_EVENTS_QUERY};
use crate::error::GenResult;
use crate::fact::{build_fact_table, FactRow};
use crate::fetcher::{fetch_all, PageSource, PaginationConfig, Termination};
use crate::model::{parse_people, parse_vote_events, Person, VoteEvent};
use crate::normalize::{flatten_people, flatten_vote_events};
use crate::person::{build_person_dim, PersonDim};
use crate::person_vote::{build_person_vote_summary, PersonVoteSummary};
use crate::term::{LatestFixedWidthTerm, TermPolicy};
use crate::vote_detail::{build_vote_detail, VoteDetail};
use crate::votes::{qualifying_votes, VoteScope};
use crate::writer::OutputWriter;
use politigraph_common::RunConfig;
use std::path::PathBuf;
use tracing::{debug, info};

/// The four derived tables
#[derive(Debug, Clone, Default)]
pub struct GeneratedTables {
    pub person: Vec<PersonDim>,
    pub person_vote: Vec<PersonVoteSummary>,
    pub fact: Vec<FactRow>,
    pub vote_detail: Vec<VoteDetail>,
}

/// What a completed run fetched and wrote
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub people_fetched: usize,
    pub people_termination: Termination,
    pub vote_events_fetched: usize,
    pub vote_events_termination: Termination,
    pub person_records: usize,
    pub person_vote_records: usize,
    pub fact_records: usize,
    pub vote_detail_records: usize,
    pub files: Vec<PathBuf>,
}

/// Build all tables with the configured term policy
pub fn transform(people: &[Person], events: &[VoteEvent], config: &RunConfig) -> GeneratedTables {
    transform_with_policy(people, events, config, &LatestFixedWidthTerm::from_config(config))
}

/// Build all tables with an explicit current-term policy
pub fn transform_with_policy(
    people: &[Person],
    events: &[VoteEvent],
    config: &RunConfig,
    policy: &dyn TermPolicy,
) -> GeneratedTables {
    let person_rows = flatten_people(people);
    let person = build_person_dim(&person_rows, policy);
    info!(rows = person_rows.len(), records = person.len(), "Built person table");

    let vote_rows = flatten_vote_events(events);
    debug!(rows = vote_rows.len(), "Flattened vote events");

    let person_vote = build_person_vote_summary(&vote_rows, &config.target_year);
    info!(
        year = %config.target_year,
        records = person_vote.len(),
        "Built person vote summary"
    );

    let scope = VoteScope {
        target_year: &config.target_year,
        excluded_title: &config.excluded_event_title,
    };
    let votes = qualifying_votes(&vote_rows, &person, scope);
    debug!(votes = votes.len(), "Selected in-scope votes");

    let fact = build_fact_table(&votes);
    info!(records = fact.len(), "Built fact table");

    let vote_detail = build_vote_detail(&votes);
    info!(records = vote_detail.len(), "Built vote detail table");

    GeneratedTables {
        person,
        person_vote,
        fact,
        vote_detail,
    }
}

/// Fetch from the given sources, transform, and write the tables
pub async fn run<P, V>(
    config: &RunConfig,
    people_source: &P,
    vote_source: &V,
) -> GenResult<RunSummary>
where
    P: PageSource + ?Sized,
    V: PageSource + ?Sized,
{
    let pagination = PaginationConfig::from(config);

    info!(batch_size = pagination.batch_size, "Fetching people");
    let people_outcome = fetch_all(people_source, &pagination).await?;
    info!(
        rows = people_outcome.rows.len(),
        pages = people_outcome.pages_requested,
        termination = ?people_outcome.termination,
        "Fetched people"
    );

    info!(batch_size = pagination.batch_size, "Fetching vote events");
    let votes_outcome = fetch_all(vote_source, &pagination).await?;
    info!(
        rows = votes_outcome.rows.len(),
        pages = votes_outcome.pages_requested,
        termination = ?votes_outcome.termination,
        "Fetched vote events"
    );

    let people_fetched = people_outcome.rows.len();
    let vote_events_fetched = votes_outcome.rows.len();
    let people = parse_people(people_outcome.rows)?;
    let events = parse_vote_events(votes_outcome.rows)?;

    let tables = transform(&people, &events, config);

    info!(output_dir = %config.output_dir.display(), "Writing tables");
    let writer = OutputWriter::new(&config.output_dir);
    let files = writer.write_all(&tables)?;

    Ok(RunSummary {
        people_fetched,
        people_termination: people_outcome.termination,
        vote_events_fetched,
        vote_events_termination: votes_outcome.termination,
        person_records: tables.person.len(),
        person_vote_records: tables.person_vote.len(),
        fact_records: tables.fact.len(),
        vote_detail_records: tables.vote_detail.len(),
        files,
    })
}

/// Run against the configured GraphQL endpoint
pub async fn run_remote(config: &RunConfig) -> GenResult<RunSummary> {
    let client = GraphQlClient::new(&config.endpoint_url, config.request_timeout)?;
    let people_pages = client.pages(PEOPLE_QUERY, PEOPLE_KEY);
    let vote_pages = client.pages(VOTE_EVENTS_QUERY, VOTE_EVENTS_KEY);

    run(config, &people_pages, &vote_pages).await
}
