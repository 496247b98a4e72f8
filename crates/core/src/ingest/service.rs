//! Turns one inbound chat message into reimbursement drafts.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::reply;
use crate::matcher::{CatalogStore, ItemMatcher, MatchResult, MatchStatus};
use crate::parser::{MessageParser, ParseError, ParsedItem};
use crate::posting::{
    LineType, NewDraftEntry, PostingError, ReimbursementService, ReimbursementStore,
};

/// A chat message as delivered by the messaging gateway.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InboundMessage {
    pub sender_phone: String,
    pub sender_name: String,
    pub text: String,
    pub chat_id: String,
}

/// Accounts used for drafts created from chat messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestAccounts {
    /// Booked for lines matched to a catalog item.
    pub inventory_account_id: Uuid,
    /// Booked for ambiguous and unmatched lines.
    pub expense_account_id: Uuid,
    /// Cash account the sender paid from.
    pub cash_account_id: Option<Uuid>,
}

/// Per-status tallies reported back to the sender.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestCounts {
    pub created: usize,
    pub matched: usize,
    pub ambiguous: usize,
    pub unmatched: usize,
    pub skipped: usize,
}

/// One recorded line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestedLine {
    pub entry_id: Uuid,
    pub line: usize,
    pub description: String,
    pub quantity: Decimal,
    pub unit: Option<String>,
    pub amount: Decimal,
    pub status: MatchStatus,
    pub item_name: Option<String>,
    pub candidates: Vec<String>,
}

/// A message that was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub expense_date: NaiveDate,
    pub lines: Vec<IngestedLine>,
    pub counts: IngestCounts,
    pub total_amount: Decimal,
    pub reply: String,
}

/// A message that could not be parsed. Nothing was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestRejection {
    pub error_code: &'static str,
    pub message: String,
    pub line: Option<usize>,
    pub reply: String,
}

/// What happened to an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Drafts were created.
    Recorded(IngestReport),
    /// The text could not be read; the reply asks the sender to fix it.
    Rejected(IngestRejection),
}

impl IngestOutcome {
    /// The text to send back to the chat.
    #[must_use]
    pub fn reply(&self) -> &str {
        match self {
            Self::Recorded(report) => &report.reply,
            Self::Rejected(rejection) => &rejection.reply,
        }
    }
}

/// Chat ingestion pipeline.
pub struct IngestService<C, S> {
    catalog: C,
    reimbursements: ReimbursementService<S>,
    accounts: IngestAccounts,
}

impl<C, S> IngestService<C, S>
where
    C: CatalogStore,
    S: ReimbursementStore,
{
    /// Creates the pipeline.
    pub const fn new(
        catalog: C,
        reimbursements: ReimbursementService<S>,
        accounts: IngestAccounts,
    ) -> Self {
        Self {
            catalog,
            reimbursements,
            accounts,
        }
    }

    /// Handles one message. `today` completes dates written without a year.
    ///
    /// Parse failures are not errors: they come back as
    /// [`IngestOutcome::Rejected`] before anything is written.
    pub async fn handle(
        &self,
        message: &InboundMessage,
        today: NaiveDate,
    ) -> Result<IngestOutcome, PostingError> {
        let parsed = match MessageParser::new(today).parse(&message.text) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(
                    chat_id = %message.chat_id,
                    sender = %message.sender_phone,
                    error = %e,
                    "Rejected unreadable expense message"
                );
                return Ok(IngestOutcome::Rejected(rejection(&e, &message.text)));
            }
        };

        let matcher = ItemMatcher::new(self.catalog.active_items().await?);
        let requested_by = requester(message);

        let mut counts = IngestCounts::default();
        let mut lines = Vec::with_capacity(parsed.items.len());
        for item in &parsed.items {
            if !item.is_postable() {
                counts.skipped += 1;
                continue;
            }

            let result = matcher.match_description(&item.description);
            let entry = self
                .reimbursements
                .create_draft(self.draft_for(item, &result, parsed.expense_date, &requested_by))
                .await?;

            counts.created += 1;
            match result.status() {
                MatchStatus::Matched => counts.matched += 1,
                MatchStatus::Ambiguous => counts.ambiguous += 1,
                MatchStatus::Unmatched => counts.unmatched += 1,
            }
            lines.push(IngestedLine {
                entry_id: entry.id,
                line: item.line,
                description: entry.description,
                quantity: entry.quantity,
                unit: entry.unit,
                amount: entry.amount,
                status: result.status(),
                item_name: result.item().map(|i| i.name.clone()),
                candidates: match &result {
                    MatchResult::Ambiguous(items) => items.iter().map(|i| i.name.clone()).collect(),
                    MatchResult::Matched(_) | MatchResult::Unmatched => Vec::new(),
                },
            });
        }

        let total_amount: Decimal = lines.iter().map(|l| l.amount).sum();
        let reply = reply::recorded(parsed.expense_date, &lines, &counts, total_amount);

        info!(
            chat_id = %message.chat_id,
            sender = %message.sender_phone,
            created = counts.created,
            matched = counts.matched,
            ambiguous = counts.ambiguous,
            unmatched = counts.unmatched,
            skipped = counts.skipped,
            "Expense message recorded"
        );

        Ok(IngestOutcome::Recorded(IngestReport {
            expense_date: parsed.expense_date,
            lines,
            counts,
            total_amount,
            reply,
        }))
    }

    fn draft_for(
        &self,
        item: &ParsedItem,
        result: &MatchResult,
        expense_date: NaiveDate,
        requested_by: &str,
    ) -> NewDraftEntry {
        let (item_id, line_type, account_id) = match result.item() {
            Some(matched) => (
                Some(matched.id),
                LineType::Inventory,
                self.accounts.inventory_account_id,
            ),
            None => (None, LineType::Expense, self.accounts.expense_account_id),
        };

        NewDraftEntry {
            entry_date: expense_date,
            item_id,
            description: item.description.clone(),
            quantity: item.quantity,
            unit: item.unit.clone(),
            unit_price: item.unit_price().unwrap_or(Decimal::ZERO),
            line_type,
            account_id,
            cash_account_id: self.accounts.cash_account_id,
            outlet_id: None,
            requested_by: requested_by.to_string(),
            receipt_ref: None,
        }
    }
}

fn requester(message: &InboundMessage) -> String {
    let name = message.sender_name.trim();
    let phone = message.sender_phone.trim();
    match (name.is_empty(), phone.is_empty()) {
        (false, false) => format!("{name} ({phone})"),
        (false, true) => name.to_string(),
        (true, _) => phone.to_string(),
    }
}

fn rejection(error: &ParseError, text: &str) -> IngestRejection {
    IngestRejection {
        error_code: error.error_code(),
        message: error.to_string(),
        line: error.line(),
        reply: reply::rejected(error, text),
    }
}
