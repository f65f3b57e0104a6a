pub mod config;
pub mod data_models;
pub mod db;
pub mod ledger;
pub mod search;
pub mod session;
pub mod store;
pub mod telemetry;
pub mod transport;

pub use config::Config;
pub use data_models::{Article, SearchOutcome};
pub use ledger::RecentQueryLedger;
pub use search::SearchService;
pub use session::SearchSession;
