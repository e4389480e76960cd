pub mod log;
pub mod store;
pub mod turn;

pub use log::History;
pub use store::HistoryStore;
pub use turn::Turn;
