//! Persistence for the editor: autosave, recent files, document I/O and configuration

pub mod autosave;
pub mod config;
pub mod document;
pub mod error;
pub mod paths;
pub mod recent;
