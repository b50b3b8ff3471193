use async_trait::async_trait;

use pgdbml_core::{Result, Schema};

use crate::options::IntrospectOptions;

/// A database engine that can produce the DBML schema model.
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Short engine name used in logs, such as `postgres`.
    fn engine(&self) -> &'static str;

    async fn introspect(&self, opts: &IntrospectOptions) -> Result<Schema>;
}
