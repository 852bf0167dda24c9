//! Policy synthesis (deterministic JSON generation)

pub mod policy_builder;

pub use policy_builder::build_service_policy;
