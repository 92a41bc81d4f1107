mod settings;

pub use settings::{
    Config, ConfigError, GatewayConfig, WorkflowConfig, DEFAULT_CLEAR_DELAY, DEFAULT_GATEWAY_URL,
};
