//! Domain services for logic that spans entities.

pub mod membership_service;

pub use membership_service::MembershipAuthorizer;
