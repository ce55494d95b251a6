pub mod error;
pub mod money;
pub mod period;
pub mod query_scope;
