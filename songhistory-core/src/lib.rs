#![doc = "songhistory-core: core logic library for songhistory."]

//! This crate contains all logic, data models and the pipeline for songhistory:
//! extracting the projection history from an EasyWorship database, converting it
//! to the CSV report, and publishing it through the [`contract::Uploader`] seam.
//! The Dropbox client itself lives in the CLI crate.
//!
//! # Usage
//! Add this as a dependency for all shared pipeline, conversion, config, and sync code.

pub mod config;
pub mod contract;
pub mod convert;
pub mod extract;
pub mod ignore;
pub mod synchronise;
pub mod trigger;
