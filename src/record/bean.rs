//! The public `BeanReader`/`BeanWriter` facade (spec.md §6) plus the
//! reflection-free `BeanReaderBuilder`/`BeanWriterBuilder` registration path
//! (spec.md §4.2 "Builder variant") for record types that cannot carry
//! `#[derive(Record)]`.

use std::marker::PhantomData;

use indexmap::IndexMap;

use crate::value::{KeyString, Value};

use super::{AccessError, PropertyType, ReadAccessor, RecordObject, WriteAccessor};

/// Reflection-free registration of read accessors for a type that cannot
/// carry `#[derive(Record)]`. The Rust analogue of spec.md §6's
/// `BeanReaderBuilder`: where the source binds `(property, methodName)`
/// pairs resolved later through reflection, this binds `(property, closure)`
/// pairs directly, since Rust has no reflection to defer to.
pub struct BeanReaderBuilder<T> {
    entries: IndexMap<KeyString, ReadAccessor>,
    type_name: &'static str,
    _marker: PhantomData<fn(&T)>,
}

impl<T: RecordObject + 'static> BeanReaderBuilder<T> {
    pub fn new(type_name: &'static str) -> Self {
        BeanReaderBuilder {
            entries: IndexMap::new(),
            type_name,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub fn property(
        mut self,
        name: impl Into<KeyString>,
        declared_type: PropertyType,
        get: impl Fn(&T) -> Value + Send + Sync + 'static,
    ) -> Self {
        let name = name.into();
        let type_name = self.type_name;
        let accessor = ReadAccessor::new(name.clone(), declared_type, type_name, move |obj| {
            let concrete = obj
                .as_any()
                .downcast_ref::<T>()
                .expect("record_type_id() disagreed with as_any()'s concrete type");
            get(concrete)
        });
        self.entries.insert(name, accessor);
        self
    }

    #[must_use]
    pub fn build(self) -> IndexMap<KeyString, ReadAccessor> {
        self.entries
    }
}

/// Reflection-free registration of write accessors. Analogue of spec.md §6's
/// `BeanWriterBuilder`.
pub struct BeanWriterBuilder<T> {
    entries: IndexMap<KeyString, WriteAccessor>,
    type_name: &'static str,
    _marker: PhantomData<fn(&mut T)>,
}

impl<T: RecordObject + 'static> BeanWriterBuilder<T> {
    pub fn new(type_name: &'static str) -> Self {
        BeanWriterBuilder {
            entries: IndexMap::new(),
            type_name,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub fn property(
        mut self,
        name: impl Into<KeyString>,
        declared_type: PropertyType,
        set: impl Fn(&mut T, Value) -> Result<(), AccessError> + Send + Sync + 'static,
    ) -> Self {
        let name = name.into();
        let type_name = self.type_name;
        let accessor = WriteAccessor::new(name.clone(), declared_type, type_name, move |obj, value| {
            let concrete = obj
                .as_any_mut()
                .downcast_mut::<T>()
                .expect("record_type_id() disagreed with as_any_mut()'s concrete type");
            set(concrete, value)
        });
        self.entries.insert(name, accessor);
        self
    }

    #[must_use]
    pub fn build(self) -> IndexMap<KeyString, WriteAccessor> {
        self.entries
    }
}

/// An optional three-argument transform `(bean, propertyName, value) ->
/// value`, applied after read / before write. Spec.md §4.2's "Optional value
/// transform".
type ReadTransform<T> = Box<dyn Fn(&T, &str, Value) -> Value + Send + Sync>;
type WriteTransform<T> = Box<dyn Fn(&T, &str, Value) -> Value + Send + Sync>;

/// A read-only view of a single record type's properties, with an optional
/// include/exclude filter and an optional post-read transform. Spec.md §6's
/// `BeanReader`.
pub struct BeanReader<T> {
    include: Option<Vec<KeyString>>,
    exclude: Option<Vec<KeyString>>,
    transform: Option<ReadTransform<T>>,
    _marker: PhantomData<fn(&T)>,
}

impl<T> Default for BeanReader<T> {
    fn default() -> Self {
        BeanReader {
            include: None,
            exclude: None,
            transform: None,
            _marker: PhantomData,
        }
    }
}

impl<T: RecordObject + 'static> BeanReader<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn including(mut self, properties: impl IntoIterator<Item = impl Into<KeyString>>) -> Self {
        self.include = Some(properties.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn excluding(mut self, properties: impl IntoIterator<Item = impl Into<KeyString>>) -> Self {
        self.exclude = Some(properties.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_transform(mut self, f: impl Fn(&T, &str, Value) -> Value + Send + Sync + 'static) -> Self {
        self.transform = Some(Box::new(f));
        self
    }

    fn visible(&self, name: &str) -> bool {
        if let Some(include) = &self.include {
            if !include.iter().any(|p| p.as_str() == name) {
                return false;
            }
        }
        if let Some(exclude) = &self.exclude {
            if exclude.iter().any(|p| p.as_str() == name) {
                return false;
            }
        }
        true
    }

    /// Reads a single named property, applying the transform hook if set.
    pub fn read(&self, bean: &T, property: &str) -> Result<Value, AccessError>
    where
        T: RecordObject,
    {
        if !self.visible(property) {
            return Err(AccessError::NoSuchProperty {
                type_name: bean.schema().type_name,
                property: property.to_owned(),
            });
        }
        let schema = bean.schema();
        let accessor = schema
            .readers
            .get(property)
            .ok_or_else(|| AccessError::NoSuchProperty {
                type_name: schema.type_name,
                property: property.to_owned(),
            })?;
        let value = accessor.read(bean);
        Ok(match &self.transform {
            Some(f) => f(bean, property, value),
            None => value,
        })
    }

    /// Reads every visible property into a `Mapping`.
    pub fn read_all(&self, bean: &T) -> crate::value::Mapping {
        let schema = bean.schema();
        schema
            .readers
            .keys()
            .filter(|name| self.visible(name))
            .map(|name| {
                let value = schema.readers[name].read(bean);
                let value = match &self.transform {
                    Some(f) => f(bean, name, value),
                    None => value,
                };
                (name.clone(), value)
            })
            .collect()
    }
}

/// The write-side counterpart of [`BeanReader`]: spec.md §6's `BeanWriter`,
/// additionally implementing `copy`/`copy_non_null`/`enrich` — pairwise
/// property-by-property propagation using the writer's own property set.
pub struct BeanWriter<T> {
    include: Option<Vec<KeyString>>,
    exclude: Option<Vec<KeyString>>,
    transform: Option<WriteTransform<T>>,
    _marker: PhantomData<fn(&mut T)>,
}

impl<T> Default for BeanWriter<T> {
    fn default() -> Self {
        BeanWriter {
            include: None,
            exclude: None,
            transform: None,
            _marker: PhantomData,
        }
    }
}

impl<T: RecordObject + 'static> BeanWriter<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn including(mut self, properties: impl IntoIterator<Item = impl Into<KeyString>>) -> Self {
        self.include = Some(properties.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn excluding(mut self, properties: impl IntoIterator<Item = impl Into<KeyString>>) -> Self {
        self.exclude = Some(properties.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_transform(mut self, f: impl Fn(&T, &str, Value) -> Value + Send + Sync + 'static) -> Self {
        self.transform = Some(Box::new(f));
        self
    }

    fn visible(&self, name: &str) -> bool {
        if let Some(include) = &self.include {
            if !include.iter().any(|p| p.as_str() == name) {
                return false;
            }
        }
        if let Some(exclude) = &self.exclude {
            if exclude.iter().any(|p| p.as_str() == name) {
                return false;
            }
        }
        true
    }

    pub fn write(&self, bean: &mut T, property: &str, value: Value) -> Result<(), AccessError> {
        if !self.visible(property) {
            return Err(AccessError::NoSuchProperty {
                type_name: bean.schema().type_name,
                property: property.to_owned(),
            });
        }
        let schema = bean.schema();
        let accessor = schema
            .writers
            .get(property)
            .cloned()
            .ok_or_else(|| AccessError::NoSuchProperty {
                type_name: schema.type_name,
                property: property.to_owned(),
            })?;
        accessor.write(bean, value)
    }

    /// Copies every readable property of `source` into the matching writer
    /// of `target`, skipping properties this writer's set does not expose.
    pub fn copy(&self, source: &BeanReader<T>, from: &T, target: &mut T) -> Result<(), AccessError> {
        let schema = target.schema();
        let names: Vec<KeyString> = schema.writers.keys().cloned().collect();
        drop(schema);
        for name in names {
            if !self.visible(&name) {
                continue;
            }
            if let Ok(value) = source.read(from, &name) {
                self.write(target, &name, value)?;
            }
        }
        Ok(())
    }

    /// Like [`BeanWriter::copy`], but skips properties whose source value is
    /// `Value::Null`.
    pub fn copy_non_null(&self, source: &BeanReader<T>, from: &T, target: &mut T) -> Result<(), AccessError> {
        let schema = target.schema();
        let names: Vec<KeyString> = schema.writers.keys().cloned().collect();
        drop(schema);
        for name in names {
            if !self.visible(&name) {
                continue;
            }
            if let Ok(value) = source.read(from, &name) {
                if !matches!(value, Value::Null) {
                    self.write(target, &name, value)?;
                }
            }
        }
        Ok(())
    }

    /// Like [`BeanWriter::copy_non_null`], but additionally skips a property
    /// whose *target* already holds a non-null value — an enrich only fills
    /// gaps, it never overwrites.
    pub fn enrich(
        &self,
        source: &BeanReader<T>,
        target_reader: &BeanReader<T>,
        from: &T,
        target: &mut T,
    ) -> Result<(), AccessError> {
        let schema = target.schema();
        let names: Vec<KeyString> = schema.writers.keys().cloned().collect();
        drop(schema);
        for name in names {
            if !self.visible(&name) {
                continue;
            }
            let already_set = target_reader
                .read(&*target, &name)
                .map(|v| !matches!(v, Value::Null))
                .unwrap_or(false);
            if already_set {
                continue;
            }
            if let Ok(value) = source.read(from, &name) {
                if !matches!(value, Value::Null) {
                    self.write(target, &name, value)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::any::{Any, TypeId};
    use std::sync::Arc;

    use super::*;
    use crate::record::RecordSchema;

    /// A type that registers its schema by hand instead of via
    /// `#[derive(Record)]` — the case `BeanReaderBuilder`/`BeanWriterBuilder`
    /// exist for.
    #[derive(Clone, Debug, Default)]
    struct Person {
        name: String,
        nickname: String,
        age: i64,
    }

    impl RecordObject for Person {
        fn record_type_id(&self) -> TypeId {
            TypeId::of::<Person>()
        }

        fn schema(&self) -> Arc<RecordSchema> {
            let readers = BeanReaderBuilder::<Person>::new("Person")
                .property("name", PropertyType::Bytes, |p| Value::from(p.name.clone()))
                .property("nickname", PropertyType::Bytes, |p| Value::from(p.nickname.clone()))
                .property("age", PropertyType::Integer, |p| Value::from(p.age))
                .build();
            let writers = BeanWriterBuilder::<Person>::new("Person")
                .property("name", PropertyType::Bytes, |p, v| match v {
                    Value::Scalar(crate::value::Scalar::Bytes(s)) => {
                        p.name = s;
                        Ok(())
                    }
                    _ => Err(AccessError::TypeMismatch {
                        type_name: "Person",
                        property: "name".to_owned(),
                        declared: PropertyType::Bytes,
                    }),
                })
                .property("nickname", PropertyType::Bytes, |p, v| match v {
                    Value::Scalar(crate::value::Scalar::Bytes(s)) => {
                        p.nickname = s;
                        Ok(())
                    }
                    _ => Err(AccessError::TypeMismatch {
                        type_name: "Person",
                        property: "nickname".to_owned(),
                        declared: PropertyType::Bytes,
                    }),
                })
                .property("age", PropertyType::Integer, |p, v| match v {
                    Value::Scalar(crate::value::Scalar::Integer(i)) => {
                        p.age = i;
                        Ok(())
                    }
                    _ => Err(AccessError::TypeMismatch {
                        type_name: "Person",
                        property: "age".to_owned(),
                        declared: PropertyType::Integer,
                    }),
                })
                .build();
            Arc::new(RecordSchema::new("Person", readers, writers))
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }

        fn clone_boxed(&self) -> Box<dyn RecordObject> {
            Box::new(self.clone())
        }
    }

    fn ada() -> Person {
        Person {
            name: "Ada".to_owned(),
            nickname: String::new(),
            age: 30,
        }
    }

    #[test]
    fn bean_reader_reads_and_filters() {
        let person = ada();
        let reader = BeanReader::<Person>::new();
        assert_eq!(reader.read(&person, "name").unwrap(), Value::from("Ada"));

        let scoped = BeanReader::<Person>::new().including(["name"]);
        assert!(scoped.read(&person, "age").is_err());
        assert_eq!(scoped.read(&person, "name").unwrap(), Value::from("Ada"));
    }

    #[test]
    fn bean_reader_read_all_honors_exclude() {
        let person = ada();
        let reader = BeanReader::<Person>::new().excluding(["nickname"]);
        let all = reader.read_all(&person);
        assert!(!all.contains_key("nickname"));
        assert_eq!(all["name"], Value::from("Ada"));
    }

    #[test]
    fn bean_writer_writes_scalar() {
        let mut person = ada();
        let writer = BeanWriter::<Person>::new();
        writer.write(&mut person, "age", Value::from(31_i64)).unwrap();
        assert_eq!(person.age, 31);
    }

    #[test]
    fn bean_writer_rejects_unknown_property() {
        let mut person = ada();
        let writer = BeanWriter::<Person>::new();
        assert!(writer.write(&mut person, "ssn", Value::from("123")).is_err());
    }

    #[test]
    fn copy_propagates_every_shared_property() {
        let source = Person {
            name: "Grace".to_owned(),
            nickname: "Amazing Grace".to_owned(),
            age: 85,
        };
        let mut target = ada();
        let reader = BeanReader::<Person>::new();
        let writer = BeanWriter::<Person>::new();
        writer.copy(&reader, &source, &mut target).unwrap();
        assert_eq!(target.name, "Grace");
        assert_eq!(target.nickname, "Amazing Grace");
        assert_eq!(target.age, 85);
    }

    #[test]
    fn copy_non_null_skips_null_source_values() {
        // `nickname` reads as a non-null empty string here (Rust has no
        // distinct "absent" for a plain `String` field), so exercise the
        // skip path with a transform that nulls it out instead.
        let source = Person {
            name: "Grace".to_owned(),
            nickname: String::new(),
            age: 85,
        };
        let mut target = ada();
        target.nickname = "keep me".to_owned();
        let reader = BeanReader::<Person>::new().with_transform(|_, property, value| {
            if property == "nickname" {
                Value::Null
            } else {
                value
            }
        });
        let writer = BeanWriter::<Person>::new();
        writer.copy_non_null(&reader, &source, &mut target).unwrap();
        assert_eq!(target.name, "Grace");
        assert_eq!(target.nickname, "keep me");
    }

    #[test]
    fn enrich_only_fills_gaps() {
        let source = Person {
            name: "Grace".to_owned(),
            nickname: "Amazing Grace".to_owned(),
            age: 85,
        };
        let mut target = ada();
        target.nickname = "Already set".to_owned();
        let source_reader = BeanReader::<Person>::new();
        let target_reader = BeanReader::<Person>::new().with_transform(|p: &Person, property, value| {
            if property == "nickname" && p.nickname.is_empty() {
                Value::Null
            } else {
                value
            }
        });
        let writer = BeanWriter::<Person>::new();
        writer.enrich(&source_reader, &target_reader, &source, &mut target).unwrap();
        // `name` was already non-null on target, so it is left untouched even
        // though the source has a different value.
        assert_eq!(target.name, "Ada");
        assert_eq!(target.nickname, "Already set");
    }
}
