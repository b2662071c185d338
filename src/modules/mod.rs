pub mod auth;
pub mod books;
pub mod home;

use inout_kernel::{settings::Settings, ModuleRegistry};

use books::store::SharedBookStore;

/// Register all application modules with the registry
pub fn register_all(
    registry: &mut ModuleRegistry,
    settings: &Settings,
    store: SharedBookStore,
) -> anyhow::Result<()> {
    registry.register(home::create_module())?;
    registry.register(books::create_module(store))?;
    registry.register(auth::create_module(&settings.auth))?;
    Ok(())
}
