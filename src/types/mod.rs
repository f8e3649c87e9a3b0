mod page;
pub use self::page::Page;

mod subsidy;
pub use self::subsidy::Subsidy;

mod content;
pub use self::content::ContentMetadata;

mod transaction;
pub use self::transaction::{
    CreateTransactionRequest, Transaction, TransactionList, TransactionState,
};

mod deposit;
pub use self::deposit::{CreateDepositRequest, Deposit};
