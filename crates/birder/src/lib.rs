// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Birder bot runtime
//!
//! Reads chat messages line by line, resolves post links and commands through
//! the [`x_api`] client and answers each message with a JSON reply.
//!
//! # Module Structure
//!
//! - [`config`]: Layered configuration with validated values
//! - [`dispatch`]: Command parsing and reply building
//! - [`error`]: Runtime error types
//! - [`runtime`]: The stdin/stdout message loop

pub mod config;
pub mod dispatch;
pub mod error;
pub mod runtime;

pub use config::{BirderConfig, Environment, PageSize, TimeoutSeconds};
pub use dispatch::{Command, Dispatcher, Reply};
pub use error::{BirderError, BirderResult};
pub use runtime::run;
