//! # reaction-service
//!
//! Application layer: the reaction store, aggregation, services, and DTOs.

pub mod dto;
pub mod services;

pub use services::{
    ReactionAggregator, ReactionService, ReactionStore, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult,
};
