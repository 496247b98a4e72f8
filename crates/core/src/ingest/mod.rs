//! Chat-message ingestion: parse, match, record drafts, reply.

mod reply;
pub mod service;

#[cfg(test)]
mod tests;

pub use service::{
    InboundMessage, IngestAccounts, IngestCounts, IngestOutcome, IngestRejection, IngestReport,
    IngestService, IngestedLine,
};
