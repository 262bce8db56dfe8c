//! Field Parser
//!
//! Extracts the known customer scalars and detects indexed-array field
//! names for item records. Field names are classified by an ordered list
//! of matchers (known scalar, then indexed item, then discard) so a new
//! convention can be added without touching assembly logic. Parsing is a
//! pure transformation: every decode failure becomes a warning, never an
//! error.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tradein_core::{ScalarFields, Warning};

use crate::form::RawForm;

/// Attribute name -> raw string value for one item index.
pub type AttrBag = HashMap<String, String>;

/// Parser output: customer scalars plus per-index attribute fragments,
/// keyed ascending so assembly inherits the ordering invariant for free.
#[derive(Debug, Default)]
pub struct ParsedFields {
    pub scalar: ScalarFields,
    pub item_attrs: BTreeMap<u32, AttrBag>,
    pub warnings: Vec<Warning>,
}

const SCALAR_NAMES: &[&str] = &[
    "customer_name",
    "customer_phone",
    "customer_email",
    "customer_instagram",
    "customer_location",
    "dropoff_method",
    "payment_methods",
];

/// Field carrying the JSON-encoded alternative item representation.
const PAIRS_JSON_FIELD: &str = "pairs_json";

/// Classification of one field name.
#[derive(Debug, PartialEq, Eq)]
enum FieldMatch {
    Scalar(&'static str),
    Item { index: u32, attribute: String },
    Unknown,
}

fn indexed_item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^pairs\[(\d+)\]\[([^\]]+)\]$").expect("static regex"))
}

/// Ordered matchers: known scalar names first, then the indexed-bracket
/// convention, then discard. Unknown names are forward-compatible noise.
fn classify(name: &str) -> FieldMatch {
    if let Some(scalar) = SCALAR_NAMES.iter().copied().find(|s| *s == name) {
        return FieldMatch::Scalar(scalar);
    }
    if let Some(caps) = indexed_item_re().captures(name) {
        if let Ok(index) = caps[1].parse::<u32>() {
            return FieldMatch::Item {
                index,
                attribute: caps[2].to_string(),
            };
        }
    }
    FieldMatch::Unknown
}

/// Parse one form post into scalars and item attribute fragments.
pub fn parse_form(form: &RawForm) -> ParsedFields {
    let mut warnings = Vec::new();

    let get = |name: &str| -> String {
        form.get(name).map(|v| v.trim().to_string()).unwrap_or_default()
    };

    let scalar = ScalarFields {
        customer_name: get("customer_name"),
        customer_phone: get("customer_phone"),
        customer_email: get("customer_email"),
        customer_instagram: get("customer_instagram"),
        customer_location: get("customer_location"),
        dropoff_method: get("dropoff_method"),
        payment_methods: parse_payment_methods(form.get("payment_methods"), &mut warnings),
    };

    // The JSON blob, when present and well-formed, replaces indexed-field
    // parsing entirely; when malformed it is treated as absent.
    let item_attrs = match parse_pairs_json(form.get(PAIRS_JSON_FIELD), &mut warnings) {
        Some(attrs) => attrs,
        None => parse_indexed_fields(form),
    };

    ParsedFields {
        scalar,
        item_attrs,
        warnings,
    }
}

/// payment_methods arrives either as a bare string or as a JSON-encoded
/// list of strings. A bare string becomes a single-element list;
/// unparseable JSON becomes an empty list with a warning.
fn parse_payment_methods(raw: Option<&str>, warnings: &mut Vec<Warning>) -> Vec<String> {
    let raw = match raw {
        Some(v) => v.trim(),
        None => return Vec::new(),
    };
    if raw.is_empty() {
        return Vec::new();
    }
    if raw.starts_with('[') {
        match serde_json::from_str::<Vec<String>>(raw) {
            Ok(methods) => return methods,
            Err(e) => {
                warnings.push(Warning::MalformedField {
                    field: "payment_methods".to_string(),
                    detail: e.to_string(),
                });
                return Vec::new();
            }
        }
    }
    vec![raw.to_string()]
}

/// Decode the `pairs_json` alternative representation. `None` means the
/// field was absent or malformed and indexed-field parsing applies.
fn parse_pairs_json(
    raw: Option<&str>,
    warnings: &mut Vec<Warning>,
) -> Option<BTreeMap<u32, AttrBag>> {
    let raw = raw.map(str::trim).filter(|v| !v.is_empty())?;

    let parsed: Vec<Value> = match serde_json::from_str(raw) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            warnings.push(Warning::MalformedField {
                field: PAIRS_JSON_FIELD.to_string(),
                detail: "expected a JSON array of item objects".to_string(),
            });
            return None;
        }
        Err(e) => {
            warnings.push(Warning::MalformedField {
                field: PAIRS_JSON_FIELD.to_string(),
                detail: e.to_string(),
            });
            return None;
        }
    };

    let mut attrs = BTreeMap::new();
    for (position, item) in parsed.into_iter().enumerate() {
        let mut bag = AttrBag::new();
        if let Value::Object(map) = item {
            for (key, value) in map {
                // Tolerate non-string scalars; nested values are noise.
                let text = match value {
                    Value::String(s) => s.trim().to_string(),
                    Value::Bool(b) => b.to_string(),
                    Value::Number(n) => n.to_string(),
                    _ => continue,
                };
                bag.insert(key, text);
            }
        }
        attrs.insert(position as u32, bag);
    }
    Some(attrs)
}

/// Collect `pairs[<index>][<attribute>]` fragments from the raw fields.
fn parse_indexed_fields(form: &RawForm) -> BTreeMap<u32, AttrBag> {
    let mut attrs: BTreeMap<u32, AttrBag> = BTreeMap::new();
    for (name, value) in form.iter() {
        if let FieldMatch::Item { index, attribute } = classify(name) {
            attrs
                .entry(index)
                .or_default()
                .insert(attribute, value.trim().to_string());
        }
    }
    attrs
}
