// cargo: dep = "serde"
// cargo: dep = "serde_json"
// cargo: dep = "wasm-bindgen"
// cargo: dep = "web-sys"
// cargo: dep = "js-sys"
// cargo: dep = "thiserror"
// cargo: dep = "log"
// cargo: dep = "console_log"
// cargo: dep = "console_error_panic_hook"

mod bindings;
pub mod error;
pub mod models;
pub mod services;
mod utils;

use wasm_bindgen::prelude::*;

pub use bindings::LocalConfiguration;
pub use error::{ConfigurationError, StorageError};
pub use models::{ConfigurationBlob, NAMESPACE_KEY};
pub use services::local_configuration::LocalConfigurationStore;
pub use services::storage::{BrowserStorage, KeyValueStorage, MemoryStorage};

#[wasm_bindgen(start)]
pub fn start() {
    utils::set_panic_hook();
    utils::init_logging();
}
