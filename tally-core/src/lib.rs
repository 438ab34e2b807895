//! tally-core: canonical transaction schema, amount parsing and the cross-document ledger.

pub mod ledger;
pub mod money;
pub mod transaction;

pub use ledger::{Ledger, merge};
pub use money::parse_amount;
pub use transaction::{CanonicalTransaction, DedupKey, TransactionType};
