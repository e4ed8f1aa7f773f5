pub mod api;
pub mod config;
pub mod conversion;
pub mod dataset;
pub mod models;
pub mod service;
pub mod storage;
