//! Energy estimation on top of the batching loader
//!
//! - [`EnergyAggregator`]: totals over a trailing window of days
//! - [`TransactionEnergyResolver`]: per-transaction energies of one block
//! - [`EnergyService`]: the validated entry point used by API resolvers

pub mod aggregator;
pub mod service;
pub mod transactions;

pub use aggregator::{AggregateReport, EnergyAggregator};
pub use service::EnergyService;
pub use transactions::{Page, TransactionEnergy, TransactionEnergyResolver};
