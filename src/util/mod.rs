//! Utility modules

pub mod format;
pub mod paths;

pub use format::format_file_size;
pub use paths::{config_path, data_dir, init_data_dir, log_file_path, logs_dir};
