//! Chat reply text.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use tally_shared::types::format_amount;

use super::service::{IngestCounts, IngestedLine};
use crate::matcher::MatchStatus;
use crate::parser::ParseError;

pub(super) fn recorded(
    expense_date: NaiveDate,
    lines: &[IngestedLine],
    counts: &IngestCounts,
    total: Decimal,
) -> String {
    let mut out = vec![format!(
        "Recorded {} item(s) for {}",
        counts.created,
        expense_date.format("%d %b %Y")
    )];

    out.extend(lines.iter().enumerate().map(|(n, line)| {
        let quantity = match &line.unit {
            Some(unit) => format!("{} {unit}", line.quantity.normalize()),
            None => line.quantity.normalize().to_string(),
        };
        let tag = match (line.status, &line.item_name) {
            (MatchStatus::Matched, Some(name)) => name.clone(),
            (MatchStatus::Ambiguous, _) => format!("ambiguous: {}", line.candidates.join(", ")),
            _ => "unmatched".to_string(),
        };
        format!(
            "{}. {} {} = {} [{tag}]",
            n + 1,
            line.description,
            quantity,
            format_amount(line.amount)
        )
    }));

    out.push(format!("Total: {}", format_amount(total)));

    let mut summary = format!(
        "Created {}, matched {}, ambiguous {}, unmatched {}",
        counts.created, counts.matched, counts.ambiguous, counts.unmatched
    );
    if counts.skipped > 0 {
        summary.push_str(&format!(", skipped {} with zero quantity", counts.skipped));
    }
    out.push(summary);

    out.join("\n")
}

pub(super) fn rejected(error: &ParseError, text: &str) -> String {
    format!("Sorry, the report could not be read.\n{error}\n\nYour message:\n{text}")
}
