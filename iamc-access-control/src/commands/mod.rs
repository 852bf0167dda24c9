//! Commands module - service layer for iamc operations

mod access;
pub(crate) mod service;
mod users;

pub use service::AccessControlService;
