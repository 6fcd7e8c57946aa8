/// Trait for the REST backend resources.
///
/// Combines the data of a record with the static metadata of its type
/// (index, collection path, UI labels).
pub trait Resource {
    // ============================================================================
    // Instance methods
    // ============================================================================

    /// Record id as the backend returns it
    fn id(&self) -> &str;

    /// Display name of the record
    fn display_name(&self) -> &str;

    // ============================================================================
    // Type metadata
    // ============================================================================

    /// Resource index in the system (e.g. "a001")
    fn resource_index() -> &'static str;

    /// Collection name (e.g. "product")
    fn collection_name() -> &'static str;

    /// Collection path on the backend (e.g. "/api/productos")
    fn collection_path() -> &'static str;

    /// Element name for the UI (singular)
    fn element_name() -> &'static str;

    /// List name for the UI (plural)
    fn list_name() -> &'static str;

    // ============================================================================
    // Provided methods
    // ============================================================================

    /// Full resource name (e.g. "a001_product"), equal to the tab key
    fn full_name() -> String {
        format!("{}_{}", Self::resource_index(), Self::collection_name())
    }

    /// Path of a single record (e.g. "/api/productos/42")
    fn item_path(id: &str) -> String {
        format!("{}/{}", Self::collection_path(), id)
    }
}
