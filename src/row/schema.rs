use super::value::ColumnType;

/// A declared column: its name plus semantic type. Position is implied by
/// order of declaration in the owning [`TableSchema`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    name: &'static str,
    ty: ColumnType,
}

impl Column {
    pub const fn new(name: &'static str, ty: ColumnType) -> Self {
        Column { name, ty }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.ty
    }
}

/// The shape of one table or table-valued function: declared columns in
/// positional order and the (possibly empty) primary key.
///
/// Positions are 1-based throughout, matching SQL column numbering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableSchema {
    name: &'static str,
    columns: Vec<Column>,
    key_positions: Vec<usize>,
}

impl TableSchema {
    /// Build a schema. `key_positions` are 1-based indexes into `columns`;
    /// function row shapes pass an empty key.
    pub fn new(name: &'static str, columns: Vec<Column>, key_positions: Vec<usize>) -> Self {
        debug_assert!(key_positions
            .iter()
            .all(|&p| p >= 1 && p <= columns.len()));
        TableSchema {
            name,
            columns,
            key_positions,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column at a 1-based position, or `None` when out of range.
    pub fn column_at(&self, position: usize) -> Option<&Column> {
        if position == 0 {
            return None;
        }
        self.columns.get(position - 1)
    }

    /// 1-based position of a named column, or `None` when unknown.
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name).map(|i| i + 1)
    }

    /// 1-based positions of the primary-key columns, in key order.
    pub fn key_positions(&self) -> &[usize] {
        &self.key_positions
    }
}

/// A database sequence backing a generator-assigned key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceDef {
    name: &'static str,
}

impl SequenceDef {
    pub const fn new(name: &'static str) -> Self {
        SequenceDef { name }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TableSchema {
        TableSchema::new(
            "sample",
            vec![
                Column::new("id", ColumnType::Integer),
                Column::new("name", ColumnType::Text),
            ],
            vec![1],
        )
    }

    #[test]
    fn positions_are_one_based() {
        let schema = sample();
        assert_eq!(schema.position_of("id"), Some(1));
        assert_eq!(schema.position_of("name"), Some(2));
        assert_eq!(schema.position_of("missing"), None);
        assert_eq!(schema.column_at(1).map(Column::name), Some("id"));
        assert!(schema.column_at(0).is_none());
        assert!(schema.column_at(3).is_none());
    }
}
