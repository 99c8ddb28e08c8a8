#![doc = "mailpdf-core: core pipeline library for mailpdf."]

//! This crate turns version-controlled email templates into PDF artifacts:
//! a single template, one template compared across every branch, or every
//! template in a repository snapshot.
//!
//! # Layout
//! - [`parser`], [`archive`], [`resolver`], [`branches`], [`compose`], [`render`]:
//!   the individual pipeline stages, leaf first.
//! - [`pipeline`]: the orchestrator tying the stages together.
//! - [`contract`]: collaborator traits and shared data types.
//! - [`github`]: the GitHub implementation of the source traits.
//!
//! Chat integration (uploading, reply messages) lives in the `mailpdf` crate.

pub mod archive;
pub mod branches;
pub mod compose;
pub mod config;
pub mod contract;
pub mod error;
pub mod github;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod resolver;
