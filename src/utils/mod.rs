pub mod fair_draw;
pub mod seed;

pub use fair_draw::select_winners;
pub use seed::generate_server_seed;
