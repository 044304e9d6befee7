//! API support shared by WVM services

pub mod auth;
