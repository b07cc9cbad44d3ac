//! CLI command implementations

pub(crate) mod common;
pub(crate) mod create;
pub(crate) mod down;
pub(crate) mod insert;
pub(crate) mod reset;
pub(crate) mod status;
pub(crate) mod up;
pub(crate) mod version;
