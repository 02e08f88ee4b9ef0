//! Terminal frontend for MockingBird.
//!
//! ## Bootstrap
//!
//! The `mockingbird` binary loads a `.env` file when present, then reads:
//!
//! - `MOCKINGBIRD_API_URL` base URL of the interviewer service (default `http://localhost:3000`)
//! - `MOCKINGBIRD_API_KEY` sent as `x-api-key`; a missing key surfaces in-band as a 401
//! - `MOCKINGBIRD_INTERVIEW_SECONDS` countdown length, must be > 0
//! - `MOCKINGBIRD_TIMEOUT_SEC` HTTP timeout, must be > 0
//! - `MOCKINGBIRD_LOG` / `MOCKINGBIRD_LOG_LEVEL` log file and filter; no logging when unset
//!
//! Chat and feedback calls run on a tokio runtime owned by [`runtime::RuntimeController`];
//! their results come back through the same channel as terminal input, so the session
//! controller only ever runs on the loop thread in [`app::run`].

pub mod app;
pub mod logging;
pub mod questions;
pub mod runtime;
pub mod tui;
