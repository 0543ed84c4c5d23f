mod consts;
mod credentials;
mod logging;

pub use credentials::{
    with_default_extension, ConfigError, Credentials, CredentialsStore, JsonFileCredentialsStore,
};
pub use logging::init_logger;
