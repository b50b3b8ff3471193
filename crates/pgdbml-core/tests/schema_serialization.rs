use pgdbml_core::{Column, Reference, ReferentialAction, Schema, Table};

#[test]
fn serializes_schema_deterministically() {
    let mut id = Column::new("id", "int");
    id.nullable = false;
    id.is_primary_key = true;

    let schema = Schema {
        tables: vec![Table {
            columns: vec![id],
            primary_keys: vec!["id".to_string()],
            references: vec![Reference {
                from_schema: "public".to_string(),
                from_table: "users".to_string(),
                from_columns: vec!["id".to_string()],
                to_schema: "auth".to_string(),
                to_table: "accounts".to_string(),
                to_columns: vec!["id".to_string()],
                on_delete: ReferentialAction::SetNull,
                on_update: ReferentialAction::NoAction,
            }],
            ..Table::new("public", "users")
        }],
    };

    let json = serde_json::to_string_pretty(&schema).expect("serialize schema");
    let expected = r#"{
  "tables": [
    {
      "name": "users",
      "schema": "public",
      "columns": [
        {
          "name": "id",
          "data_type": "int",
          "nullable": false,
          "default": null,
          "is_primary_key": true
        }
      ],
      "primary_keys": [
        "id"
      ],
      "indexes": [],
      "references": [
        {
          "from_schema": "public",
          "from_table": "users",
          "from_columns": [
            "id"
          ],
          "to_schema": "auth",
          "to_table": "accounts",
          "to_columns": [
            "id"
          ],
          "on_delete": "set_null",
          "on_update": "no_action"
        }
      ]
    }
  ]
}"#;
    assert_eq!(json, expected);

    let decoded: Schema = serde_json::from_str(&json).expect("deserialize schema");
    assert_eq!(decoded, schema);
}
