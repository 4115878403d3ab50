//! Logging support for the `orion_discovery` binary

mod lazy_file_writer;
pub mod tracing;
