use redb::TableDefinition;

/// Table for the durable client collections.
/// Key: storage key name (e.g. "favorites")
/// Value: JSON document
pub const CLIENT_STORAGE_TABLE: TableDefinition<&str, &str> =
    TableDefinition::new("client_storage");
