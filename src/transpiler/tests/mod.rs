//! Transpiler tests.


use crate::mapping::{ColumnDef, FieldRef, TableDefinition};

pub(super) const ID: FieldRef = FieldRef::new("t_multiple_boolean", "id");
pub(super) const BOOLEAN_FLAG: FieldRef = FieldRef::new("t_multiple_boolean", "booleanFlag");
pub(super) const PRIMITIVE_FLAG: FieldRef = FieldRef::new("t_multiple_boolean", "primitiveFlag");
pub(super) const OBJECT_FLAG: FieldRef = FieldRef::new("t_multiple_boolean", "objectFlag");

pub(super) fn flags_table() -> TableDefinition {
    TableDefinition::new("t_multiple_boolean")
        .column(ColumnDef::integer("id", "id").primary_key())
        .column(ColumnDef::boolean("booleanFlag", "boolean_flag"))
        .column(ColumnDef::int_flag("primitiveFlag", "primitive_flag"))
        .column(ColumnDef::nullable_int_flag("objectFlag", "object_flag"))
}
