//! # Lessonpad Architecture
//!
//! Lessonpad is a **UI-agnostic lesson-planning library** with a command-line
//! client. Teachers compose lesson plans, optionally ask a generative-AI
//! service to fill in the details, and keep the plans in a local key/value
//! store.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (main.rs, args.rs, render.rs)                          │
//! │  - Parses arguments, renders results, owns stdout/stderr    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API (api.rs) and commands (commands/*.rs)                  │
//! │  - Facade + one function per user action                    │
//! │  - Return `CmdResult`, never print                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Controllers (controller/)          AI client (ai/)         │
//! │  - Planner draft + suggestion       - Prompt, endpoint call │
//! │  - List + edit session              - Extract, then parse   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Repository (repository.rs) over a KeyValueStore (store/)   │
//! │  - Lessons keyed `<prefix>_<uuid>`                          │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every lesson carries a UUID from the moment it is created. The CLI shows
//! 1-based list positions instead (see [`index`]) and resolves them to ids
//! before anything reaches storage.
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr, never exits the
//! process and never prompts. Diagnostics go through `tracing`; whether and
//! where they are shown is up to the binary.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: One function per user action
//! - [`controller`]: Planner and list session state
//! - [`ai`]: Suggestion client and the Gemini endpoint
//! - [`repository`]: Lesson CRUD over a key/value store
//! - [`store`]: Key/value storage abstraction and implementations
//! - [`model`]: Core data types (`LessonRecord`, `Lesson`, `Suggestion`)
//! - [`index`]: Display indexes and id prefixes
//! - [`config`]: Configuration management
//! - [`editor`]: Lesson form and external editor integration
//! - [`error`]: Error types

pub mod ai;
pub mod api;
pub mod commands;
pub mod config;
pub mod controller;
pub mod editor;
pub mod error;
pub mod index;
pub mod model;
pub mod repository;
pub mod store;
