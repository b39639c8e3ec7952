mod types;

pub use types::ResourceType;

use crate::error::Result;

/// The ResourceProvider trait defines what a resource container must offer
/// to the code that resolves resources by name
pub trait ResourceProvider {
    /// Whether this container can hold resources of the given type
    fn supports(&self, ty: ResourceType) -> bool;

    /// Look up a resource by case-insensitive name and exact type.
    ///
    /// Returns `Ok(None)` when the resource is absent; errors are reserved for
    /// corrupt containers.
    fn find(&self, name: &str, ty: ResourceType) -> Result<Option<&[u8]>>;
}
