mod common;
pub use self::common::Query;

mod subsidy;
pub use self::subsidy::SubsidyListQuery;

mod transaction;
pub use self::transaction::TransactionListQuery;
