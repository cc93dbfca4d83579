// Business logic services

pub mod bulk;
pub mod fetch;
pub mod person;

pub use bulk::{BulkService, BulkSummary};
pub use fetch::{FetchEntry, FetchService};
pub use person::PersonService;
