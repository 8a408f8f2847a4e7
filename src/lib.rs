//! # events-api
//!
//! `events-api` is a thin HTTP front end for the event stored procedures that
//! live in the MySQL database. The procedures own all business logic and
//! authorization; this service only checks that a request is well formed,
//! forwards it, and shapes the single row the procedure returns into a JSON
//! response.
//!
//! ## Request flow
//!
//! 1. **Auth headers:** `x-api-user-id` and `x-api-token` must both be present.
//!    They are not verified here, only forwarded to the procedure.
//! 2. **Body validation:** create/update bodies are checked against a rule
//!    table and every offending field is reported (`422`).
//! 3. **Procedure call:** one connection per request, one `CALL`, at most one
//!    row read back.
//! 4. **Normalization:** the `'S'` status marker becomes a boolean,
//!    `secure_data` is dropped and the embedded `data` JSON is parsed.
//!
//! Every failure is rendered as one of three JSON envelopes, see
//! [`api::ApiError`].

pub mod api;
pub mod cli;
pub mod db;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
