#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! Keyboard shortcut handling for macOS: modifier encodings, rendering,
//! key combinations, conflict validation and global hotkey registration.

#[cfg(target_os = "macos")]
pub mod ax;
pub mod cli;
pub mod commands;
pub mod config;
pub mod hotkey;
pub mod keys;
pub mod types;
pub mod validate;
