//! End-to-end tests against an in-memory SQLite database.
//!
//! One table holds three flavours of boolean-like field: a native boolean, a
//! non-null int flag and a nullable int flag.

use fieldql::prelude::*;

#[derive(Debug, Clone, PartialEq)]
struct MultipleBoolean {
    id: i64,
    boolean_flag: bool,
    primitive_flag: i32,
    object_flag: Option<i32>,
}

impl MultipleBoolean {
    const ID: FieldRef = FieldRef::new("t_multiple_boolean", "id");
    const BOOLEAN_FLAG: FieldRef = FieldRef::new("t_multiple_boolean", "booleanFlag");
    const PRIMITIVE_FLAG: FieldRef = FieldRef::new("t_multiple_boolean", "primitiveFlag");
    const OBJECT_FLAG: FieldRef = FieldRef::new("t_multiple_boolean", "objectFlag");
}

impl FromRow for MultipleBoolean {
    fn from_row(row: &Row) -> FieldqlResult<Self> {
        Ok(Self {
            id: row.get("id")?,
            boolean_flag: row.get("booleanFlag")?,
            primitive_flag: row.get("primitiveFlag")?,
            object_flag: row.get("objectFlag")?,
        })
    }
}

impl Model for MultipleBoolean {
    const TABLE: &'static str = "t_multiple_boolean";

    fn definition() -> TableDefinition {
        TableDefinition::new(Self::TABLE)
            .column(ColumnDef::integer("id", "id").primary_key())
            .column(ColumnDef::boolean("booleanFlag", "boolean_flag"))
            .column(ColumnDef::int_flag("primitiveFlag", "primitive_flag"))
            .column(ColumnDef::nullable_int_flag("objectFlag", "object_flag"))
    }

    fn to_values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", self.id.into()),
            ("booleanFlag", self.boolean_flag.into()),
            ("primitiveFlag", self.primitive_flag.into()),
            ("objectFlag", self.object_flag.into()),
        ]
    }
}

const CREATE_TABLE: &str = "CREATE TABLE t_multiple_boolean (
    id INTEGER PRIMARY KEY,
    boolean_flag BOOLEAN NOT NULL,
    primitive_flag INTEGER NOT NULL,
    object_flag INTEGER
)";

/// All 12 combinations of the three flags.
fn combinations() -> Vec<MultipleBoolean> {
    let mut rows = Vec::new();
    for boolean_flag in [false, true] {
        for primitive_flag in [0, 1] {
            for object_flag in [None, Some(0), Some(1)] {
                rows.push(MultipleBoolean {
                    id: rows.len() as i64 + 1,
                    boolean_flag,
                    primitive_flag,
                    object_flag,
                });
            }
        }
    }
    rows
}

async fn seeded_db() -> Db {
    let registry = Registry::new().with_model::<MultipleBoolean>().unwrap();
    let config = Config::builder()
        .database("sqlite::memory:")
        .max_connections(1)
        .build();
    let db = Db::open(&config.database, registry).await.unwrap();
    db.execute_raw(CREATE_TABLE).await.unwrap();
    assert_eq!(db.insert_all(&combinations()).await.unwrap(), 12);
    db
}

#[tokio::test]
async fn test_chained_flags_narrow_the_count() {
    let db = seeded_db().await;

    let native = db
        .from::<MultipleBoolean>()
        .unwrap()
        .where_(&MultipleBoolean::BOOLEAN_FLAG)
        .unwrap()
        .is_true();
    assert_eq!(native.select_count_statement().unwrap().params, vec![Value::Bool(true)]);
    assert_eq!(native.select_count().await.unwrap(), 6);

    let primitive = db
        .from::<MultipleBoolean>()
        .unwrap()
        .where_(&MultipleBoolean::BOOLEAN_FLAG)
        .unwrap()
        .is_true()
        .and(&MultipleBoolean::PRIMITIVE_FLAG)
        .unwrap()
        .is_true();
    assert_eq!(primitive.select_count().await.unwrap(), 3);

    let object = db
        .from::<MultipleBoolean>()
        .unwrap()
        .where_(&MultipleBoolean::BOOLEAN_FLAG)
        .unwrap()
        .is_true()
        .and(&MultipleBoolean::PRIMITIVE_FLAG)
        .unwrap()
        .is_true()
        .and(&MultipleBoolean::OBJECT_FLAG)
        .unwrap()
        .is_false();
    let stmt = object.select_count_statement().unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT COUNT(*) FROM t_multiple_boolean WHERE boolean_flag = ? AND primitive_flag = ? AND object_flag = ?"
    );
    assert_eq!(stmt.params, vec![Value::Bool(true), Value::Int(1), Value::Int(0)]);
    assert_eq!(object.select_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_select_decodes_models() {
    let db = seeded_db().await;

    let rows: Vec<MultipleBoolean> = db
        .from::<MultipleBoolean>()
        .unwrap()
        .where_(&MultipleBoolean::BOOLEAN_FLAG)
        .unwrap()
        .is_false()
        .and(&MultipleBoolean::OBJECT_FLAG)
        .unwrap()
        .is_null()
        .order_by(&MultipleBoolean::ID)
        .unwrap()
        .select()
        .await
        .unwrap();

    let expected: Vec<MultipleBoolean> = combinations()
        .into_iter()
        .filter(|m| !m.boolean_flag && m.object_flag.is_none())
        .collect();
    assert_eq!(rows, expected);
}

#[tokio::test]
async fn test_or_and_parsed_filters() {
    let db = seeded_db().await;

    let either = db
        .from::<MultipleBoolean>()
        .unwrap()
        .where_(&MultipleBoolean::PRIMITIVE_FLAG)
        .unwrap()
        .is_true()
        .or(&MultipleBoolean::OBJECT_FLAG)
        .unwrap()
        .is_true()
        .select_count()
        .await
        .unwrap();
    // 6 with primitive_flag = 1, plus 2 where only object_flag = 1
    assert_eq!(either, 8);

    let parsed = db
        .from_table("t_multiple_boolean")
        .unwrap()
        .parse_filter("booleanFlag IS TRUE AND objectFlag IS NOT NULL")
        .unwrap()
        .select_count()
        .await
        .unwrap();
    assert_eq!(parsed, 4);
}

#[tokio::test]
async fn test_model_update_and_delete_by_primary_key() {
    let db = seeded_db().await;
    let mut first = combinations().remove(0);
    assert_eq!(first.object_flag, None);

    first.object_flag = Some(1);
    first.boolean_flag = true;
    assert_eq!(db.update(&first).await.unwrap(), 1);

    let reloaded: Vec<MultipleBoolean> = db
        .from::<MultipleBoolean>()
        .unwrap()
        .where_(&MultipleBoolean::ID)
        .unwrap()
        .is_equal(first.id)
        .select()
        .await
        .unwrap();
    assert_eq!(reloaded, vec![first.clone()]);

    assert_eq!(db.delete(&first).await.unwrap(), 1);
    let remaining = db.from::<MultipleBoolean>().unwrap().select_count().await.unwrap();
    assert_eq!(remaining, 11);
}

#[tokio::test]
async fn test_bulk_update_and_delete() {
    let db = seeded_db().await;

    let updated = db
        .from::<MultipleBoolean>()
        .unwrap()
        .set(&MultipleBoolean::OBJECT_FLAG, true)
        .unwrap()
        .where_(&MultipleBoolean::OBJECT_FLAG)
        .unwrap()
        .is_null()
        .update()
        .await
        .unwrap();
    assert_eq!(updated, 4);

    let deleted = db
        .from::<MultipleBoolean>()
        .unwrap()
        .where_(&MultipleBoolean::OBJECT_FLAG)
        .unwrap()
        .is_true()
        .delete()
        .await
        .unwrap();
    assert_eq!(deleted, 8);
    assert_eq!(
        db.from::<MultipleBoolean>().unwrap().select_count().await.unwrap(),
        4
    );
}

#[tokio::test]
async fn test_coercion_error_never_reaches_database() {
    let db = seeded_db().await;

    let err = db
        .from::<MultipleBoolean>()
        .unwrap()
        .where_(&MultipleBoolean::BOOLEAN_FLAG)
        .unwrap()
        .is_equal(Value::Null)
        .select_count()
        .await
        .unwrap_err();
    assert!(err.is_coercion());

    let ghost = FieldRef::new("t_multiple_boolean", "ghost");
    let err = db.from::<MultipleBoolean>().unwrap().where_(&ghost).err().unwrap();
    assert!(err.is_mapping());
}

#[tokio::test]
async fn test_select_reads_native_booleans_back() {
    let db = seeded_db().await;

    let rows = db
        .from_table("t_multiple_boolean")
        .unwrap()
        .where_(&MultipleBoolean::ID)
        .unwrap()
        .is_equal(12)
        .select()
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].value("booleanFlag"), Some(&Value::Bool(true)));
    assert_eq!(rows[0].value("objectFlag"), Some(&Value::Int(1)));
}

#[tokio::test]
async fn test_int_flag_comparisons_keep_their_operand() {
    let db = seeded_db().await;

    let below_two = db
        .from::<MultipleBoolean>()
        .unwrap()
        .where_(&MultipleBoolean::PRIMITIVE_FLAG)
        .unwrap()
        .less_than(2);
    assert_eq!(below_two.select_count_statement().unwrap().params, vec![Value::Int(2)]);
    assert_eq!(below_two.select_count().await.unwrap(), 12);

    let not_five = db
        .from::<MultipleBoolean>()
        .unwrap()
        .where_(&MultipleBoolean::PRIMITIVE_FLAG)
        .unwrap()
        .is_not_equal(5)
        .select_count()
        .await
        .unwrap();
    assert_eq!(not_five, 12);

    db.execute_raw("UPDATE t_multiple_boolean SET primitive_flag = 2 WHERE id = 1")
        .await
        .unwrap();
    let twos: Vec<MultipleBoolean> = db
        .from::<MultipleBoolean>()
        .unwrap()
        .where_(&MultipleBoolean::PRIMITIVE_FLAG)
        .unwrap()
        .is_equal(2)
        .select()
        .await
        .unwrap();
    assert_eq!(twos.len(), 1);
    assert_eq!(twos[0].primitive_flag, 2);
}

#[tokio::test]
async fn test_in_memory_database_survives_concurrent_queries() {
    let registry = Registry::new().with_model::<MultipleBoolean>().unwrap();
    let db = Db::connect("sqlite::memory:", registry).await.unwrap();
    db.execute_raw(CREATE_TABLE).await.unwrap();
    db.insert_all(&combinations()).await.unwrap();

    let db = &db;
    let count = move || async move {
        db.from::<MultipleBoolean>().unwrap().select_count().await
    };
    let (a, b, c) = tokio::join!(count(), count(), count());
    assert_eq!((a.unwrap(), b.unwrap(), c.unwrap()), (12, 12, 12));
}

#[tokio::test]
async fn test_undecodable_column_is_an_error() {
    let mut registry = Registry::new();
    registry
        .register_definition(
            TableDefinition::new("t_payload")
                .column(ColumnDef::integer("id", "id").primary_key())
                .column(ColumnDef::text("payload", "payload")),
        )
        .unwrap();
    let db = Db::connect("sqlite::memory:", registry).await.unwrap();
    db.execute_raw("CREATE TABLE t_payload (id INTEGER PRIMARY KEY, payload BLOB)")
        .await
        .unwrap();
    db.execute_raw("INSERT INTO t_payload (id, payload) VALUES (1, x'00ff')")
        .await
        .unwrap();

    let err = db.from_table("t_payload").unwrap().select().await.unwrap_err();
    assert!(matches!(err, FieldqlError::Decode(_)), "{err}");
}
