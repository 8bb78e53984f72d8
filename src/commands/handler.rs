use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use super::request::{Reply, Request};
use crate::cache::SegmentCache;
use crate::config::Config;
use crate::indexer::ArchiveIndexer;
use crate::timestamps::parse_query_time;

/// Answers command requests against one archive root
pub struct CommandHandler {
    indexer: ArchiveIndexer,
    root: PathBuf,
}

impl CommandHandler {
    pub fn new(indexer: ArchiveIndexer, root: impl Into<PathBuf>) -> Self {
        Self { indexer, root: root.into() }
    }

    /// Build a handler with its own segment cache sized from `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache = Arc::new(SegmentCache::new(config.cache_capacity()?));
        let indexer = ArchiveIndexer::from_config(config, cache)?;
        Ok(Self::new(indexer, config.save_path.clone()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn indexer(&self) -> &ArchiveIndexer {
        &self.indexer
    }

    /// Parse one JSON message and answer it
    pub fn handle_message(&self, message: &str) -> Reply {
        info!("Received command: {}", message.trim());

        match serde_json::from_str::<Request>(message) {
            Ok(request) => self.handle(&request),
            Err(e) => {
                warn!("Rejected command: {}", e);
                Reply::error(format!("Invalid command: {}", e))
            }
        }
    }

    pub fn handle(&self, request: &Request) -> Reply {
        match request {
            Request::Record { begin, end } => self.record(begin, end),
            other => Reply::error(format!(
                "Command '{}' is not supported by this service",
                other.name()
            )),
        }
    }

    fn record(&self, begin: &str, end: &str) -> Reply {
        let zone = self.indexer.zone();

        let begin = match parse_query_time(begin, zone) {
            Ok(ts) => ts,
            Err(e) => return Reply::error(format!("Invalid begin time: {:#}", e)),
        };
        let end = match parse_query_time(end, zone) {
            Ok(ts) => ts,
            Err(e) => return Reply::error(format!("Invalid end time: {:#}", e)),
        };

        match self.indexer.query(&self.root, begin, end) {
            Ok(segments) => Reply::Segments(segments),
            Err(e) => {
                warn!("Record query failed: {:#}", e);
                Reply::error(format!("Failed to list recordings: {:#}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn handler_for(root: &Path) -> CommandHandler {
        let config = Config { save_path: root.to_path_buf(), ..Config::default() };
        CommandHandler::from_config(&config).unwrap()
    }

    fn archive_with(files: &[&str]) -> TempDir {
        let root = TempDir::new().expect("Failed to create temp dir");
        for file in files {
            let path = root.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).expect("Failed to create parent dir");
            fs::write(&path, b"").expect("Failed to write segment");
        }
        root
    }

    #[test]
    fn test_record_command_lists_segments() {
        let root = archive_with(&["hw/2021-10-09/15-38-05.mp4"]);
        let handler = handler_for(root.path());

        let reply = handler.handle_message(
            r#"{"command": "record", "begin": "2021-10-09 00:00:00", "end": "2021-10-09 23:59:59"}"#,
        );

        let Reply::Segments(segments) = reply else {
            panic!("Expected segments");
        };
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].relative_path, "hw/2021-10-09/15-38-05.mp4");
        assert_eq!(segments[0].timestamp(), 1633765085);
        assert_eq!(segments[0].duration, 0);
        assert_eq!(segments[0].size_bytes, 0);
    }

    #[test]
    fn test_record_command_with_no_matches() {
        let root = archive_with(&["hw/2021-10-09/15-38-05.mp4"]);
        let handler = handler_for(root.path());

        let reply = handler.handle(&Request::Record {
            begin: "2020-01-01 00:00:00".to_string(),
            end: "2020-01-02 00:00:00".to_string(),
        });
        assert_eq!(reply, Reply::Segments(Vec::new()));
    }

    #[test]
    fn test_bad_times_are_reported() {
        let root = archive_with(&[]);
        let handler = handler_for(root.path());

        let reply = handler.handle(&Request::Record {
            begin: "yesterday".to_string(),
            end: "2020-01-02 00:00:00".to_string(),
        });
        let Reply::Error { error } = reply else {
            panic!("Expected error reply");
        };
        assert!(error.starts_with("Invalid begin time"));

        let reply = handler.handle(&Request::Record {
            begin: "2020-01-01 00:00:00".to_string(),
            end: "2020-01-02".to_string(),
        });
        assert!(matches!(reply, Reply::Error { error } if error.starts_with("Invalid end time")));
    }

    #[test]
    fn test_walk_failure_is_an_error_reply() {
        let root = TempDir::new().expect("Failed to create temp dir");
        let handler = handler_for(&root.path().join("missing"));

        let reply = handler.handle_message(
            r#"{"command": "record", "begin": "2021-10-09 00:00:00", "end": "2021-10-10 00:00:00"}"#,
        );
        assert!(matches!(
            reply,
            Reply::Error { error } if error.starts_with("Failed to list recordings")
        ));
    }

    #[test]
    fn test_unsupported_and_invalid_commands() {
        let root = archive_with(&[]);
        let handler = handler_for(root.path());

        let reply = handler.handle_message(r#"{"command": "start"}"#);
        assert_eq!(reply, Reply::error("Command 'start' is not supported by this service"));

        let reply = handler.handle_message(r#"{"command": "reboot"}"#);
        assert!(matches!(reply, Reply::Error { error } if error.starts_with("Invalid command")));

        let reply = handler.handle_message("{");
        assert!(reply.is_error());
    }
}
