//! # Chat Room Server Library
//!
//! This crate provides a chat-room backend with:
//! - Personal (1:1) rooms deduplicated per unordered user pair
//! - Group rooms with batch membership creation
//! - Membership-gated access to room metadata and history
//! - Cursor-based (seek) pagination over room lists and message history
//! - PostgreSQL for persistent storage
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Core business entities and repository traits
//! - **Application Layer**: Command/query services and DTOs
//! - **Infrastructure Layer**: Database implementations and metrics
//! - **Presentation Layer**: HTTP handlers and middleware
//!
//! ## Module Structure
//!
//! ```text
//! chat_room_server/
//! +-- config/        Configuration management
//! +-- domain/        Domain entities and traits
//! +-- application/   Application services and DTOs
//! +-- infrastructure/ Database and metrics implementations
//! +-- presentation/  HTTP routes, handlers and middleware
//! +-- shared/        Common utilities (errors, snowflake IDs, pagination)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
