//! In-memory reference implementations of the store seams.

mod invoice_store;
mod sink;
mod user_store;

pub use invoice_store::MemoryInvoiceStore;
pub use sink::{LogSink, RecordingSink};
pub use user_store::MemoryUserStore;
