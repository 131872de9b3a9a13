mod settings;

pub use settings::{Command, Config, ExpirySettings, Settings};
