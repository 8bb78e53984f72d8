pub mod environment;
pub mod paths;

pub use environment::{CONFIG_ENV_VAR, config_path_from_env, default_config_path};
pub use paths::{is_hidden_file_name, is_hidden_segment_path, relative_segment_path};
