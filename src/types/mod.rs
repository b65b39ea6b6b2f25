//! Type definitions for the churn prediction service

pub mod customer;
pub mod prediction;

pub use customer::{ContractType, CustomerRecord, InvalidField, YesNo};
pub use prediction::{ChurnLabel, Verdict};
