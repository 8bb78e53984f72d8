//! JSON command requests and replies
//!
//! The recorder controller receives commands as JSON objects tagged by `command`:
//!
//! ```json
//! {"command": "record", "begin": "2021-10-11 00:00:00", "end": "2021-10-11 23:59:59"}
//! ```
//!
//! A successful `record` query replies with a JSON array of segment records (empty when
//! nothing matched). Every failure replies with `{"error": "..."}`, so a client can tell
//! "no recordings in range" apart from "the query failed".
//!
//! Recorder lifecycle commands (`start`, `stop`, `switch`) and `upload` are recognized but
//! answered with an error: this service only indexes the archive.

pub mod handler;
pub mod request;

pub use handler::CommandHandler;
pub use request::{Reply, Request};
