//! Wire encodings accepted and produced by `POST /expenses`.
//!
//! The negotiated [`MediaType`] is used twice per request: once to decode
//! the body into an [`ExpenseRecord`], once to encode the reply.

use api_types::expense::{JSON, XML};
use ledger::{ExpenseRecord, FieldValue};
use quick_xml::{Reader, events::Event};
use serde::Serialize;
use thiserror::Error;

/// Root element of every XML reply.
const XML_ROOT: &str = "response";

/// Fields kept verbatim even when their text reads as a number.
const TEXT_FIELDS: [&str; 2] = ["payee", "date"];

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("cannot decode payload: {0}")]
    Decode(String),
    #[error("cannot encode response: {0}")]
    Encode(String),
}

fn decode_error(err: impl ToString) -> CodecError {
    CodecError::Decode(err.to_string())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaType {
    Json,
    Xml,
}

impl MediaType {
    /// Match a `Content-Type` value against the supported media types.
    ///
    /// Parameters such as `charset` are ignored, the type itself is compared
    /// case-insensitively.
    pub fn from_content_type(value: &str) -> Option<Self> {
        let essence = value.split(';').next().unwrap_or_default().trim();
        if essence.eq_ignore_ascii_case(JSON) {
            Some(Self::Json)
        } else if essence.eq_ignore_ascii_case(XML) {
            Some(Self::Xml)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => JSON,
            Self::Xml => XML,
        }
    }

    pub fn decode_expense(self, body: &[u8]) -> Result<ExpenseRecord, CodecError> {
        match self {
            Self::Json => serde_json::from_slice(body).map_err(decode_error),
            Self::Xml => decode_xml_expense(body),
        }
    }

    pub fn encode<T: Serialize>(self, value: &T) -> Result<Vec<u8>, CodecError> {
        match self {
            Self::Json => {
                serde_json::to_vec(value).map_err(|err| CodecError::Encode(err.to_string()))
            }
            Self::Xml => quick_xml::se::to_string_with_root(XML_ROOT, value)
                .map(String::into_bytes)
                .map_err(|err| CodecError::Encode(err.to_string())),
        }
    }
}

/// Decode `<expense><payee>..</payee>..</expense>`.
///
/// The root name is free. Every child is a flat field; nested elements,
/// stray text and anything past the root are rejected.
fn decode_xml_expense(body: &[u8]) -> Result<ExpenseRecord, CodecError> {
    let text = std::str::from_utf8(body).map_err(decode_error)?;
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut root_seen = false;
    let mut in_root = false;
    let mut field: Option<(String, String)> = None;
    let mut fields = Vec::new();

    loop {
        match reader.read_event().map_err(decode_error)? {
            Event::Start(start) => {
                let name = std::str::from_utf8(start.name().as_ref())
                    .map_err(decode_error)?
                    .to_string();
                match (root_seen, in_root, field.is_some()) {
                    (false, _, _) => {
                        root_seen = true;
                        in_root = true;
                    }
                    (true, true, false) => field = Some((name, String::new())),
                    (true, true, true) => {
                        return Err(decode_error(format!("nested element <{name}>")));
                    }
                    (true, false, _) => {
                        return Err(decode_error(format!("second root element <{name}>")));
                    }
                }
            }
            Event::Empty(empty) => {
                let name = std::str::from_utf8(empty.name().as_ref())
                    .map_err(decode_error)?
                    .to_string();
                match (root_seen, in_root, field.is_some()) {
                    (false, _, _) => root_seen = true,
                    (true, true, false) => fields.push((name, FieldValue::from(""))),
                    _ => return Err(decode_error(format!("unexpected element <{name}/>"))),
                }
            }
            Event::End(_) => match field.take() {
                Some((name, value)) => {
                    let value = if TEXT_FIELDS.contains(&name.as_str()) {
                        FieldValue::Text(value)
                    } else {
                        FieldValue::from_text(&value)
                    };
                    fields.push((name, value));
                }
                None => in_root = false,
            },
            Event::Text(content) => match field.as_mut() {
                Some((_, value)) => value.push_str(&content.unescape().map_err(decode_error)?),
                None => return Err(decode_error("text outside of a field")),
            },
            Event::CData(content) => match field.as_mut() {
                Some((_, value)) => {
                    value.push_str(std::str::from_utf8(&content).map_err(decode_error)?)
                }
                None => return Err(decode_error("character data outside of a field")),
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if !root_seen || in_root {
        return Err(decode_error("missing or unterminated root element"));
    }

    Ok(fields.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use api_types::{ApiError, expense::ExpenseCreated};

    use super::*;

    const STARBUCKS_JSON: &str = r#"{"payee":"Starbucks","amount":5.75,"date":"2017-06-10"}"#;
    const STARBUCKS_XML: &str = "<?xml version=\"1.0\"?>\n<expense>\n  <payee>Starbucks</payee>\n  \
                                 <amount>5.75</amount>\n  <date>2017-06-10</date>\n</expense>";

    fn starbucks() -> ExpenseRecord {
        ExpenseRecord::from_iter([
            ("payee", FieldValue::from("Starbucks")),
            ("amount", FieldValue::from(5.75)),
            ("date", FieldValue::from("2017-06-10")),
        ])
    }

    #[test]
    fn negotiates_supported_types() {
        assert_eq!(
            MediaType::from_content_type("application/json"),
            Some(MediaType::Json)
        );
        assert_eq!(MediaType::from_content_type("text/xml"), Some(MediaType::Xml));
        assert_eq!(
            MediaType::from_content_type("Application/JSON; charset=utf-8"),
            Some(MediaType::Json)
        );
    }

    #[test]
    fn rejects_unknown_types() {
        assert_eq!(MediaType::from_content_type("application/json203"), None);
        assert_eq!(MediaType::from_content_type("application/xml"), None);
        assert_eq!(MediaType::from_content_type(""), None);
        assert_eq!(MediaType::from_content_type(";json"), None);
    }

    #[test]
    fn decodes_json_and_xml_to_the_same_record() {
        let json = MediaType::Json
            .decode_expense(STARBUCKS_JSON.as_bytes())
            .unwrap();
        let xml = MediaType::Xml.decode_expense(STARBUCKS_XML.as_bytes()).unwrap();

        assert_eq!(json, starbucks());
        assert_eq!(xml, starbucks());
    }

    #[test]
    fn payload_in_the_other_format_does_not_decode() {
        assert!(MediaType::Json.decode_expense(STARBUCKS_XML.as_bytes()).is_err());
        assert!(MediaType::Xml.decode_expense(STARBUCKS_JSON.as_bytes()).is_err());
    }

    #[test]
    fn malformed_xml_does_not_decode() {
        for body in [
            "",
            "<expense><payee>Starbucks</payee>",
            "<expense><payee><name>Starbucks</name></payee></expense>",
            "<expense>loose<payee>Starbucks</payee></expense>",
            "<expense/><expense/>",
            "<expense><payee>Starbucks</amount></expense>",
        ] {
            assert!(
                MediaType::Xml.decode_expense(body.as_bytes()).is_err(),
                "{body:?} should not decode"
            );
        }
    }

    #[test]
    fn xml_edge_shapes_decode() {
        let record = MediaType::Xml
            .decode_expense(b"<expense><payee/><note><![CDATA[a & b]]></note></expense>")
            .unwrap();
        assert_eq!(record.get("payee"), Some(&FieldValue::from("")));
        assert_eq!(record.get("note"), Some(&FieldValue::from("a & b")));

        let empty = MediaType::Xml.decode_expense(b"<expense/>").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn numeric_looking_xml_text_is_kept_verbatim() {
        let record = MediaType::Xml
            .decode_expense(
                b"<expense><payee>1e3</payee><amount>5</amount><date>20170610</date>\
                  <ref>123456789012345678901234567</ref></expense>",
            )
            .unwrap();

        assert_eq!(record.get("payee"), Some(&FieldValue::from("1e3")));
        assert_eq!(record.get("amount"), Some(&FieldValue::from(5i64)));
        assert_eq!(record.get("date"), Some(&FieldValue::from("20170610")));
        assert_eq!(
            record.get("ref"),
            Some(&FieldValue::from("123456789012345678901234567"))
        );
    }

    #[test]
    fn encodes_replies_in_both_formats() {
        let created = ExpenseCreated { expense_id: 417 };

        let json = MediaType::Json.encode(&created).unwrap();
        assert_eq!(json, br#"{"expense_id":417}"#);

        let xml = String::from_utf8(MediaType::Xml.encode(&created).unwrap()).unwrap();
        assert_eq!(xml, "<response><expense_id>417</expense_id></response>");

        let error = ApiError::new("Invalid expense: `payee` is required");
        let xml = String::from_utf8(MediaType::Xml.encode(&error).unwrap()).unwrap();
        let decoded: ApiError = quick_xml::de::from_str(&xml).unwrap();
        assert_eq!(decoded, error);
    }
}
