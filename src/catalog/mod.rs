//! Test case catalog
//!
//! An ordered, immutable list of request descriptors. Each descriptor is a
//! JSON object sent verbatim to the store; the catalog never validates or
//! fills in fields.

mod scenario;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::common::{Error, Result};

pub use scenario::{Scenario, ScenarioTarget};

/// Operations understood by the bucket store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Insert,
    Get,
    GetAllBuckets,
    GetBucket,
    GetAll,
    Delete,
    DeleteBucket,
}

impl Method {
    /// Every method, in the order the reference catalog exercises them
    pub const ALL: [Method; 7] = [
        Method::Insert,
        Method::Get,
        Method::GetAllBuckets,
        Method::GetBucket,
        Method::GetAll,
        Method::Delete,
        Method::DeleteBucket,
    ];

    /// Wire name of the method
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Insert => "insert",
            Method::Get => "get",
            Method::GetAllBuckets => "get_all_buckets",
            Method::GetBucket => "get_bucket",
            Method::GetAll => "get_all",
            Method::Delete => "delete",
            Method::DeleteBucket => "delete_bucket",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Method::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| Error::Scenario(format!("Unknown method '{}'", s)))
    }
}

/// One request against the store, as an ordered JSON object
///
/// Field order is insertion order and is kept on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestDescriptor(Map<String, Value>);

impl RequestDescriptor {
    fn with_method(method: Method) -> Self {
        let mut fields = Map::new();
        fields.insert("method".to_string(), Value::from(method.as_str()));
        Self(fields)
    }

    fn field(mut self, key: &str, value: Value) -> Self {
        self.0.insert(key.to_string(), value);
        self
    }

    /// Store a record in a bucket, optionally expiring after `ttl` seconds
    pub fn insert(bucket: &str, data: Value, ttl: Option<u64>) -> Self {
        let descriptor = Self::with_method(Method::Insert)
            .field("bucket", Value::from(bucket))
            .field("data", data);
        match ttl {
            Some(ttl) => descriptor.field("ttl", Value::from(ttl)),
            None => descriptor,
        }
    }

    /// Fetch records in a bucket matching every field of `pattern`
    pub fn get(bucket: &str, pattern: Value) -> Self {
        Self::with_method(Method::Get)
            .field("bucket", Value::from(bucket))
            .field("pattern", pattern)
    }

    pub fn get_all_buckets() -> Self {
        Self::with_method(Method::GetAllBuckets)
    }

    pub fn get_bucket(bucket: &str) -> Self {
        Self::with_method(Method::GetBucket).field("bucket", Value::from(bucket))
    }

    pub fn get_all() -> Self {
        Self::with_method(Method::GetAll)
    }

    /// Remove records in a bucket matching every field of `pattern`
    pub fn delete(bucket: &str, pattern: Value) -> Self {
        Self::with_method(Method::Delete)
            .field("bucket", Value::from(bucket))
            .field("pattern", pattern)
    }

    pub fn delete_bucket(bucket: &str) -> Self {
        Self::with_method(Method::DeleteBucket).field("bucket", Value::from(bucket))
    }

    /// Wrap an arbitrary object as-is, including ones the store will reject
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Parsed `method` field, if present and recognized
    pub fn method(&self) -> Option<Method> {
        self.0
            .get("method")
            .and_then(Value::as_str)
            .and_then(|m| m.parse().ok())
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl TryFrom<Value> for RequestDescriptor {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(Error::Scenario(format!(
                "Test case must be a mapping, got: {}",
                other
            ))),
        }
    }
}

/// Ordered list of test cases
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    cases: Vec<RequestDescriptor>,
}

impl Catalog {
    pub fn new(cases: Vec<RequestDescriptor>) -> Self {
        Self { cases }
    }

    /// The reference script: insert, read back, list, then clean up
    pub fn reference() -> Self {
        Self::new(vec![
            RequestDescriptor::insert(
                "users",
                serde_json::json!({"username": "hatim", "age": 18}),
                Some(20),
            ),
            RequestDescriptor::get("users", serde_json::json!({"age": 18})),
            RequestDescriptor::get_all_buckets(),
            RequestDescriptor::get_bucket("users"),
            RequestDescriptor::get_all(),
            RequestDescriptor::delete("users", serde_json::json!({"username": "hatim"})),
            RequestDescriptor::delete_bucket("users"),
        ])
    }

    /// Cases with their 1-based position
    pub fn cases(&self) -> impl Iterator<Item = (usize, &RequestDescriptor)> {
        self.cases.iter().enumerate().map(|(i, case)| (i + 1, case))
    }

    pub fn get(&self, position: usize) -> Option<&RequestDescriptor> {
        position.checked_sub(1).and_then(|i| self.cases.get(i))
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}
