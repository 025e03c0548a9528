pub mod boosts;
pub mod prize_credits;
pub mod raffle_entries;
pub mod raffle_ledgers;
pub mod raffles;
pub mod ticket_transactions;
pub mod users;

pub use boosts as boost_entity;
pub use prize_credits as prize_credit_entity;
pub use raffle_entries as raffle_entry_entity;
pub use raffle_ledgers as raffle_ledger_entity;
pub use raffles as raffle_entity;
pub use ticket_transactions as ticket_transaction_entity;
pub use users as user_entity;

pub use raffles::RaffleStatus;
pub use ticket_transactions::TicketTransactionType;
