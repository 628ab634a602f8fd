//! End-to-end coverage of `#[derive(Record)]` traversed through
//! `PathWalker`: the Record structural category (spec.md §3/§4.3/§4.4),
//! reached by descending through a `Mapping` and a `ReferenceArray` first.

use objectpath::record::PropertyType;
use objectpath::{ComponentType, Path, PathWalker, ReferenceArray, Record, Value};

#[derive(Clone, Debug, Record)]
struct Address {
    city: String,
    zip: i64,
}

#[derive(Clone, Debug, Record)]
struct Employee {
    name: String,
    age: i64,
    active: bool,
    address: Address,
}

fn employee_value() -> Value {
    Value::Record(Box::new(Employee {
        name: "Ada".to_owned(),
        age: 30,
        active: true,
        address: Address {
            city: "Springfield".to_owned(),
            zip: 90210,
        },
    }))
}

#[test]
fn reads_scalar_properties() {
    let root = employee_value();
    let walker = PathWalker::new();
    assert_eq!(walker.read(&root, &Path::from("name")).unwrap(), Value::from("Ada"));
    assert_eq!(walker.read(&root, &Path::from("age")).unwrap(), Value::from(30_i64));
    assert_eq!(walker.read(&root, &Path::from("active")).unwrap(), Value::from(true));
}

#[test]
fn reads_nested_record_property() {
    // `address` holds an `Address`, itself a record — the Record variant is
    // not limited to a single level of descent.
    let root = Value::Record(Box::new(Employee {
        name: "Ada".to_owned(),
        age: 30,
        active: true,
        address: Address {
            city: "Shelbyville".to_owned(),
            zip: 1,
        },
    }));
    let walker = PathWalker::new();
    let value = walker.read(&root, &Path::from("address.city")).unwrap();
    assert_eq!(value, Value::from("Shelbyville"));
}

#[test]
fn writes_scalar_property() {
    let mut root = employee_value();
    let walker = PathWalker::new();
    walker.write(&mut root, &Path::from("age"), Value::from(31_i64)).unwrap();
    assert_eq!(walker.read(&root, &Path::from("age")).unwrap(), Value::from(31_i64));
}

#[test]
fn writes_through_nested_record_property() {
    let mut root = employee_value();
    let walker = PathWalker::new();
    walker
        .write(&mut root, &Path::from("address.city"), Value::from("Capital City"))
        .unwrap();
    assert_eq!(
        walker.read(&root, &Path::from("address.city")).unwrap(),
        Value::from("Capital City")
    );
    // A sibling property on the same nested record survives the write-back.
    assert_eq!(walker.read(&root, &Path::from("address.zip")).unwrap(), Value::from(90210_i64));
}

#[test]
fn unknown_property_is_no_such_property() {
    let root = employee_value();
    let walker = PathWalker::new();
    let err = walker.read(&root, &Path::from("nickname")).unwrap_err();
    assert_eq!(err.code, objectpath::ErrorCode::NoSuchProperty);
}

#[test]
fn type_mismatch_on_write_is_rejected() {
    let mut root = employee_value();
    let walker = PathWalker::new();
    let err = walker
        .write(&mut root, &Path::from("age"), Value::from("not a number"))
        .unwrap_err();
    assert_eq!(err.code, objectpath::ErrorCode::TypeMismatch);
}

#[test]
fn record_inside_reference_array_inside_mapping() {
    let employees = ReferenceArray::new(
        ComponentType::Any,
        vec![employee_value(), Value::from("not a record")],
    );
    let mut root = Value::mapping();
    if let Value::Mapping(map) = &mut root {
        map.insert("employees".into(), Value::ReferenceArray(employees));
    }

    let walker = PathWalker::new();
    let name = walker.read(&root, &Path::from("employees.0.name")).unwrap();
    assert_eq!(name, Value::from("Ada"));
}

#[test]
fn schema_declares_types() {
    let employee = Employee {
        name: "Ada".to_owned(),
        age: 30,
        active: true,
        address: Address {
            city: "Springfield".to_owned(),
            zip: 1,
        },
    };
    let schema = objectpath::record::RecordObject::schema(&employee);
    assert_eq!(schema.readers["age"].declared_type, PropertyType::Integer);
    assert_eq!(schema.readers["active"].declared_type, PropertyType::Boolean);
    assert_eq!(schema.readers["name"].declared_type, PropertyType::Bytes);
}
