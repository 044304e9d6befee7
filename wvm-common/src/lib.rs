//! # WVM Common Library
//!
//! Core of the WEP venue maps service:
//! - Catalog document model and store
//! - Cascade create/update/delete with image cleanup
//! - Photo-request review queue
//! - Static HTML export
//! - Upload area, admin auth and configuration

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod files;
pub mod ids;
pub mod photo_requests;
pub mod time;

pub use error::{Error, Result};
