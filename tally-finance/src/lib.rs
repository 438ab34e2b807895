//! tally-finance: normalization of raw statement records, transaction type rules, the
//! per-document processor and ledger export.

pub mod export;
pub mod normalize;
pub mod period;
pub mod statement;
pub mod type_rules;

pub use export::{ledger_file_name, write_csv, write_ledger};
pub use normalize::{Normalized, Normalizer, normalize};
pub use period::{StatementPeriod, infer_period};
pub use statement::{StatementOutcome, StatementProcessor, StatementReport};
pub use type_rules::classify;
