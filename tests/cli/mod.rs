//! Tests of the `batq` binary.

pub mod commands_test;
