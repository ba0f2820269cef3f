// Testing Tools Library
//
// This crate provides testing utilities for the chat relay.
// Currently includes:
// - relay-test-client: end-to-end broadcast testing tool

pub mod output;
pub mod scenarios;
pub mod ws_client;
