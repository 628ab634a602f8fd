//! The process-wide, insert-only schema cache described in spec.md §4.2/§5.
//!
//! Concurrent `schema_for::<T>()` calls on the same `T` must observe either a
//! fully-built schema or none — never a partially-built one — and read-through
//! under an existing entry must not contend with other readers. A
//! `RwLock`-guarded `HashMap` gives us exactly that: the common case (entry
//! already present) takes only a read lock; the write lock is taken solely
//! on the miss path to insert the freshly-built schema, mirroring the
//! teacher's `once_cell::sync::Lazy` statics (see `path::owned::VALID_FIELD`)
//! generalized from a single static value to a per-type cache.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;
use tracing::trace;

use super::{Record, RecordSchema};

static SCHEMAS: Lazy<RwLock<HashMap<TypeId, Arc<RecordSchema>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Returns the cached schema for `T`, introspecting (via `T::build_schema`)
/// and publishing it on first touch.
pub fn schema_for<T: Record>() -> Arc<RecordSchema> {
    let type_id = TypeId::of::<T>();
    if let Some(schema) = SCHEMAS.read().expect("schema cache poisoned").get(&type_id) {
        return Arc::clone(schema);
    }

    // Miss path: build outside the write lock (introspection never touches
    // the cache itself), then publish. Two concurrent first-touchers may
    // duplicate the build, as spec.md §9 allows, but the result they publish
    // is identical and only one copy survives in the map.
    let built = Arc::new(T::build_schema());
    trace!(type_name = built.type_name, "record schema built");
    let mut guard = SCHEMAS.write().expect("schema cache poisoned");
    Arc::clone(guard.entry(type_id).or_insert(built))
}
