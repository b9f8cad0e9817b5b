// Shopping Calc - Core Library
// Exposes all modules for use in the CLI, the TUI, and tests

pub mod parser;
pub mod cart;
pub mod settings;
pub mod ledger;
pub mod aggregate;

// TUI surface - only with the tui feature
#[cfg(feature = "tui")]
pub mod ui;

// Re-export commonly used types
pub use parser::parse_price;
pub use cart::{Cart, CartError};
pub use settings::{Settings, SettingsStore, DEFAULT_TAX_RATE};
pub use ledger::{HistoryLedger, HistoryRecord};
pub use aggregate::{memo_totals, recent_trend, MemoBucket, TrendView, NO_MEMO, TOP_MEMO_BUCKETS};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
