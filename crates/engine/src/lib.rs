pub use aggregate::{DateGroup, Stats, Windows, compute_stats, group_by_date};
pub use currency::{Currency, Grouping};
pub use error::EngineError;
pub use expense::{DEFAULT_CATEGORY, Expense, ExpenseForm};
pub use filter::{Query, filter};
pub use money::Money;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::{CORRUPT_KEY, RecordStore, STORAGE_KEY};
pub use tracker::Tracker;
pub use view::{GroupView, ItemView, StatsView, ViewModel};

mod aggregate;
mod currency;
mod error;
mod expense;
pub mod export;
mod filter;
mod money;
mod storage;
pub mod store;
mod tracker;
pub mod view;

pub type ResultEngine<T> = Result<T, EngineError>;
