//! DBML rendering for introspected schemas.

pub mod dbml;

pub use dbml::{
    SEQUENCE_DEFAULT_PREFIX, column_attributes, generate, generate_bytes, is_sequence_default,
};
