pub mod boost_service;
pub mod raffle_service;
pub mod wallet_service;

pub use boost_service::*;
pub use raffle_service::*;
pub use wallet_service::*;
