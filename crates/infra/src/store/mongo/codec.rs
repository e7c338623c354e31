//! Conversion between domain documents and BSON.
//!
//! Domain types carry `_id` as a hex string; the database stores a native
//! `ObjectId`. The swap happens here and nowhere else.

use mongodb::bson::{self, Bson, Document, oid::ObjectId};
use serde::{Serialize, de::DeserializeOwned};

use bistro_core::DocumentId;

use crate::store::StoreError;

const ID_FIELD: &str = "_id";

/// Encode a new document, replacing any client-supplied `_id` with a fresh one.
pub(crate) fn encode_new<T: Serialize>(value: &T) -> Result<(DocumentId, Document), StoreError> {
    let mut doc = bson::to_document(value).map_err(|e| StoreError::Codec(e.to_string()))?;
    let oid = ObjectId::new();
    doc.insert(ID_FIELD, oid);
    Ok((document_id(oid)?, doc))
}

/// Decode a stored document, exposing its `ObjectId` as a hex string.
pub(crate) fn decode<T: DeserializeOwned>(mut doc: Document) -> Result<T, StoreError> {
    let hex = match doc.get(ID_FIELD) {
        Some(Bson::ObjectId(oid)) => Some(oid.to_hex()),
        _ => None,
    };
    if let Some(hex) = hex {
        doc.insert(ID_FIELD, hex);
    }
    bson::from_document(doc).map_err(|e| StoreError::Codec(e.to_string()))
}

pub(crate) fn decode_all<T: DeserializeOwned>(docs: Vec<Document>) -> Result<Vec<T>, StoreError> {
    docs.into_iter().map(decode).collect()
}

pub(crate) fn object_id(id: &DocumentId) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(id.as_str()).map_err(|e| StoreError::Codec(e.to_string()))
}

pub(crate) fn document_id(oid: ObjectId) -> Result<DocumentId, StoreError> {
    oid.to_hex()
        .parse()
        .map_err(|e: bistro_core::DomainError| StoreError::Codec(e.to_string()))
}

/// Numeric field as `f64`, whichever BSON number type the server produced.
///
/// Absent and null read as 0, which is what `$sum` yields over no numbers.
pub(crate) fn number(value: Option<&Bson>) -> Result<f64, StoreError> {
    match value {
        None | Some(Bson::Null) => Ok(0.0),
        Some(Bson::Double(v)) => Ok(*v),
        Some(Bson::Int32(v)) => Ok(f64::from(*v)),
        Some(Bson::Int64(v)) => Ok(*v as f64),
        Some(Bson::Decimal128(v)) => {
            let text = v.to_string();
            text.parse()
                .map_err(|_| StoreError::Codec(format!("decimal {text} is not representable as f64")))
        }
        Some(other) => Err(StoreError::Codec(format!(
            "expected a number, found {:?}",
            other.element_type()
        ))),
    }
}
