//! Core library for Codemaker
//!
//! This crate implements the **Functional Core** of the Codemaker application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! The Codemaker project uses a two-crate architecture to enforce separation
//! of concerns:
//!
//! - **`codemaker_core`** (this crate): Pure transformation functions with zero I/O
//! - **`codemaker`**: I/O operations and orchestration (the Imperative Shell)
//!
//! All functions in this crate adhere to these principles:
//!
//! - **Pure functions**: Same input always produces the same output
//! - **No side effects**: No I/O operations, no external state mutations
//! - **Testable**: Can be tested with simple fixture data, no mocking required
//!
//! # Module Organization
//!
//! - [`chat`]: Chat-completion wire types and reply extraction
//! - [`parse`]: Recovering an idea and generated files from a model reply
//! - [`github`]: GitHub contents API payloads, transport encoding, and
//!   response classification
//!
//! Each module contains domain models, the pure transformations over them,
//! and unit tests built on fixture data (no mocking).

pub mod chat;
pub mod github;
pub mod parse;
