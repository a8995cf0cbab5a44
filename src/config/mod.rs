//! Configuration module for vidbridge.
//!
//! Settings come from an optional TOML file; the API key comes from the environment.

mod settings;

pub use settings::{
    ApiSettings, GeneralSettings, IndexModel, ModelSettings, Settings, API_KEY_ENV,
};
