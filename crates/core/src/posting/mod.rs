//! Draft → Ready → Posted pipeline.
//!
//! Three sources feed the ledger: reimbursement batches, daily sales
//! summaries and payroll runs. Each keeps its own Draft rows, which are
//! mutable until posted; posting writes one immutable ledger transaction
//! per row under a sequential code.

pub mod code;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod payroll;
pub mod reimbursement;
pub mod sales;
pub mod types;


pub use code::{CodeAllocator, CodeError, CodeSequence, CodeSource, ReadMaxAllocator};
pub use engine::{DraftLedgerSource, PostOutcome, PostingEngine};
pub use error::PostingError;
pub use ledger::{
    LedgerDraft, LedgerFilter, LedgerStore, LedgerTransaction, NewLedgerTransaction,
};
pub use payroll::{
    PayrollBatch, PayrollEntry, PayrollFilter, PayrollLine, PayrollPatch, PayrollService,
    PayrollStore,
};
pub use reimbursement::{
    BatchAssignment, DraftEntry, DraftFilter, DraftPatch, NewDraftEntry, ReimbursementService,
    ReimbursementStore, line_amount,
};
pub use sales::{
    NewSalesSummary, OrderAggregate, SalesFilter, SalesKey, SalesPatch, SalesSelection,
    SalesService, SalesStore, SalesSummary, SalesSyncRequest, SyncOutcome, net_sales,
};
pub use types::{CashDirection, EntryStatus, LineType, SourceKind};
