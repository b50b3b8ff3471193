use pgdbml_core::{Column, Index, Reference, ReferentialAction, Schema, Table, filter_tables};
use pgdbml_generate::{generate, generate_bytes};

fn column(name: &str, data_type: &str, nullable: bool, pk: bool) -> Column {
    Column {
        name: name.to_string(),
        data_type: data_type.to_string(),
        nullable,
        default: None,
        is_primary_key: pk,
    }
}

fn blog_schema() -> Schema {
    let users = Table {
        columns: vec![
            column("id", "int", false, true),
            column("email", "varchar(255)", false, false),
            column("name", "varchar(100)", true, false),
        ],
        primary_keys: vec!["id".to_string()],
        indexes: vec![Index {
            name: "idx_users_email".to_string(),
            columns: vec!["email".to_string()],
            unique: true,
        }],
        ..Table::new("public", "users")
    };

    let posts = Table {
        columns: vec![
            column("id", "int", false, true),
            column("user_id", "int", false, false),
        ],
        primary_keys: vec!["id".to_string()],
        references: vec![Reference {
            from_schema: "public".to_string(),
            from_table: "posts".to_string(),
            from_columns: vec!["user_id".to_string()],
            to_schema: "public".to_string(),
            to_table: "users".to_string(),
            to_columns: vec!["id".to_string()],
            on_delete: ReferentialAction::Cascade,
            on_update: ReferentialAction::NoAction,
        }],
        ..Table::new("public", "posts")
    };

    Schema {
        tables: vec![users, posts],
    }
}

const BLOG_DBML: &str = "\
Table posts {
  id int [pk]
  user_id int [not null]
}

Table users {
  email varchar(255) [not null]
  id int [pk]
  name varchar(100)

  indexes {
    (email) [unique]
  }
}

Ref: posts.user_id > users.id [delete: cascade]
";

#[test]
fn renders_blog_schema() {
    assert_eq!(generate(&blog_schema()), BLOG_DBML);
    assert_eq!(generate_bytes(&blog_schema()), BLOG_DBML.as_bytes());
}

#[test]
fn output_is_idempotent() {
    let schema = blog_schema();
    assert_eq!(generate(&schema), generate(&schema));
}

#[test]
fn input_order_does_not_matter() {
    let mut permuted = blog_schema();
    permuted.tables.reverse();
    for table in &mut permuted.tables {
        table.columns.reverse();
        table.indexes.reverse();
    }

    assert_eq!(generate(&permuted), BLOG_DBML);
}

#[test]
fn references_are_sorted_across_tables() {
    let mut schema = blog_schema();
    schema.tables.push(Table {
        columns: vec![
            column("post_id", "int", false, false),
            column("author_id", "int", true, false),
        ],
        references: vec![
            Reference {
                from_schema: "audit".to_string(),
                from_table: "comments".to_string(),
                from_columns: vec!["post_id".to_string()],
                to_schema: "public".to_string(),
                to_table: "posts".to_string(),
                to_columns: vec!["id".to_string()],
                ..Reference::default()
            },
            Reference {
                from_schema: "audit".to_string(),
                from_table: "comments".to_string(),
                from_columns: vec!["author_id".to_string()],
                to_schema: "public".to_string(),
                to_table: "users".to_string(),
                to_columns: vec!["id".to_string()],
                on_delete: ReferentialAction::SetNull,
                on_update: ReferentialAction::Cascade,
            },
        ],
        ..Table::new("audit", "comments")
    });

    let output = generate(&schema);
    let refs: Vec<&str> = output
        .lines()
        .filter(|line| line.starts_with("Ref:"))
        .collect();
    assert_eq!(
        refs,
        vec![
            "Ref: audit.comments.author_id > users.id [delete: set null, update: cascade]",
            "Ref: audit.comments.post_id > posts.id",
            "Ref: posts.user_id > users.id [delete: cascade]",
        ]
    );
    assert!(output.starts_with("Table audit.comments {\n  author_id int\n  post_id int [not null]\n}\n"));
}

#[test]
fn renders_defaults_and_increments() {
    let mut id = column("id", "int", false, true);
    id.default = Some("nextval('users_id_seq'::regclass)".to_string());
    let mut created_at = column("created_at", "timestamp", false, false);
    created_at.default = Some("now()".to_string());
    let mut status = column("status", "text", true, false);
    status.default = Some("'active'::text".to_string());

    let schema = Schema {
        tables: vec![Table {
            columns: vec![id, created_at, status],
            primary_keys: vec!["id".to_string()],
            ..Table::new("public", "accounts")
        }],
    };

    let output = generate(&schema);
    assert!(output.contains("  id int [pk, increment]\n"));
    assert!(output.contains("  created_at timestamp [not null, default: `now()`]\n"));
    assert!(output.contains("  status text [default: `'active'::text`]\n"));
}

#[test]
fn non_unique_indexes_render_bare_or_grouped() {
    let schema = Schema {
        tables: vec![Table {
            columns: vec![
                column("org_id", "int", false, false),
                column("created_at", "timestamp", false, false),
            ],
            indexes: vec![
                Index {
                    name: "events_org_created_idx".to_string(),
                    columns: vec!["org_id".to_string(), "created_at".to_string()],
                    unique: false,
                },
                Index {
                    name: "events_created_idx".to_string(),
                    columns: vec!["created_at".to_string()],
                    unique: false,
                },
            ],
            ..Table::new("metrics", "events")
        }],
    };

    let expected = "\
Table metrics.events {
  created_at timestamp [not null]
  org_id int [not null]

  indexes {
    created_at
    (org_id, created_at)
  }
}

";
    assert_eq!(generate(&schema), expected);
}

#[test]
fn filtered_schema_drops_tables_but_not_dangling_refs() {
    let schema = blog_schema();
    let filtered = filter_tables(&schema, &["users"]);

    let output = generate(&filtered);
    assert!(!output.contains("Table users"));
    assert!(output.contains("Ref: posts.user_id > users.id [delete: cascade]"));
    assert_eq!(generate(&schema), BLOG_DBML);
}
