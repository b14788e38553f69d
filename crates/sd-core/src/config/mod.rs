//! # Pure Data Module - Data Transfer Objects Only
//!
//! Configuration data structures. Loading, layering and path expansion live in
//! `sd-infra::config`; this module holds no policy and no validation.

mod app_config;

pub use app_config::{AppConfig, ImmediateFailurePolicy};
