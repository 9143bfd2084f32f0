pub mod analyzers;
pub mod fetch;
pub mod infra;
pub mod observation;
pub mod output;
pub mod parser;
pub mod services;
pub mod store;
pub mod topology;
