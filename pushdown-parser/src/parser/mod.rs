pub(crate) mod config;
pub(crate) mod error;
pub(crate) mod recognizer;
pub(crate) mod result;
