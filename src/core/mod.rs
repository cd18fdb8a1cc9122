//! Core business logic - framework-agnostic ledger operations.
//!
//! Every mutation path validates its input, runs the lock gate where the entity
//! has one, commits through `SeaORM`, and fires the lifecycle hooks inside the same
//! store transaction. Derived figures (account totals, sheet availability) are
//! recomputed from the store on every read.

/// Account records and account totals
pub mod account;
/// Category records
pub mod category;
/// Entry synthesis on sheet and category creation
pub mod hooks;
/// Lock gate for transactions and sheet entries
pub mod lock;
/// Sheets, month bounds and the available-to-budget chain
pub mod sheet;
/// Budgeted amounts per sheet and category
pub mod sheet_entry;
/// Transactions, gated updates and settlement on lock
pub mod transaction;
/// Structural field constraints
pub mod validation;
