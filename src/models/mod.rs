pub mod boost;
pub mod common;
pub mod pagination;
pub mod raffle;
pub mod wallet;

pub use boost::*;
pub use common::*;
pub use pagination::*;
pub use raffle::*;
pub use wallet::*;
