pub mod args;
pub mod errors;
pub mod ledger;
pub mod logging;
pub mod persistence;
pub mod report;
pub mod roster;
pub mod tracker;
