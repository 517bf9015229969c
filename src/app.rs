//! Wiring between configuration and the core [`Engine`].

use anyhow::{Context, Result};
use wordhoard_core::provider::SuggestionProvider;
use wordhoard_core::Engine;

use crate::config::Config;
use crate::file_store::FileStore;
use crate::provider::create_provider;

/// The engine the CLI runs: snapshot file store plus the configured provider.
pub type AppEngine = Engine<FileStore, Box<dyn SuggestionProvider>>;

/// Open the store at `[store] path` and build the configured provider.
pub fn open_engine(config: &Config) -> Result<AppEngine> {
    let store = FileStore::open(&config.store.path).with_context(|| {
        format!(
            "Failed to open store at {}",
            config.store.path.display()
        )
    })?;
    let provider = create_provider(&config.provider)?;
    Ok(Engine::new(store, provider))
}
