mod loader;
mod types;
pub mod validation;

pub use loader::{load_config, load_config_from_file, load_validated_config, DEFAULT_CONFIG_FILE, ENV_PREFIX};
pub use types::*;

use crate::foundation::SporkError;
use crate::infrastructure::logging::init_logger;

impl SporkConfig {
    /// Installs the global logger described by the `[log]` section.
    pub fn init_logging(&self) -> Result<(), SporkError> {
        init_logger(self.log.dir.as_deref(), &self.log.filters)
    }
}
