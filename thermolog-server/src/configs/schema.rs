use crate::models::{ApiKeyTable, ReadingTable, RoomTable, Table, UserTable};

/// Holds the table set in creation order; disposal runs in reverse so
/// referencing tables drop before their targets.
pub struct SchemaManager {
    tables: Vec<Box<dyn Table>>,
}

impl SchemaManager {
    pub fn new(tables: Vec<Box<dyn Table>>) -> Self {
        Self { tables }
    }

    pub fn create_schema(&self) -> Vec<String> {
        self.tables.iter().map(|table| table.create()).collect()
    }

    pub fn dispose_schema(&self) -> Vec<String> {
        self.tables.iter().rev().map(|table| table.dispose()).collect()
    }
}

impl Default for SchemaManager {
    fn default() -> Self {
        SchemaManager::new(vec![
            Box::new(UserTable),
            Box::new(ApiKeyTable),
            Box::new(RoomTable),
            Box::new(ReadingTable),
        ])
    }
}
