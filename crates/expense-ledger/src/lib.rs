mod aggregate;
mod ledger;
mod types;
mod upload;

pub use aggregate::{aggregate, grand_total};
pub use ledger::Ledger;
pub use types::*;
pub use upload::store_upload;
