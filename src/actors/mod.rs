pub mod raffle_actor;

pub use raffle_actor::{DrawOutcome, LedgerEntryRow, LedgerState, RaffleActorRegistry};
