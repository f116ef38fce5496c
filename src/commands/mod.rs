pub mod add;
pub mod browse;
pub mod clear;
pub mod config;
pub mod delete;
pub mod edit;
pub mod list;
pub mod search;
pub mod show;
pub mod stats;
pub mod transfer;
