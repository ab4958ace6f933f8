//! Playlist reconciliation library - shared modules for the CLI.

pub mod catalog;
pub mod config;
pub mod mix_type;
pub mod models;
pub mod normalize;
pub mod output;
pub mod parse;
pub mod permute;
pub mod progress;
pub mod reconcile;
pub mod safety;
pub mod scoring;
