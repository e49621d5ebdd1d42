//! Fieldsched Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `Job`, `Conflict`, `TechnicianDirectory`
//! - **Validated newtypes** - `JobId`, `TechnicianId`, `LocationId`, `ConflictKey`, `TimeOfDay`
//! - **Port definitions** - Traits for adapters: `JobSource`, `DispatchGateway`
//! - **Configuration** - Typed YAML config with validation and a builder
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure business logic with no external dependencies.
//! Ports define trait interfaces that adapter crates implement. The conflict
//! engine crate orchestrates domain entities through the port interfaces.

pub mod config;
pub mod domain;
pub mod ports;
