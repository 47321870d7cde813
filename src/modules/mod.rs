pub mod books;

use folio_kernel::ModuleRegistry;

use books::store::SharedStore;

/// Register all application modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, store: SharedStore) {
    registry.register(books::create_module(store));
}
