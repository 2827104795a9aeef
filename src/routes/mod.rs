// # Routes Module
//
// HTTP route handlers, grouped by the part of the API they serve.
//
// - `health`: liveness endpoint
// - `journal`: journal entries, program account info and notifications

/// Health check endpoint
pub mod health;

/// Journal entry endpoints backed by the program accessors
pub mod journal;
