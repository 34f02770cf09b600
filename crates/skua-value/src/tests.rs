//! Tests for values, coercions and index normalization.

use quickcheck_macros::quickcheck;

use crate::coerce::{fold_case, number_to_string, parse_number, to_uint32};
use crate::index::{IndexKey, MAX_INDEX};
use crate::object::{DynObject, ObjectRef};
use crate::value::Value;

// ============================================================================
// NUMBER FORMATTING
// ============================================================================

#[test]
fn test_number_to_string_specials() {
    assert_eq!(number_to_string(f64::NAN), "NaN");
    assert_eq!(number_to_string(f64::INFINITY), "Infinity");
    assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
    assert_eq!(number_to_string(0.0), "0");
    assert_eq!(number_to_string(-0.0), "0");
}

#[test]
fn test_number_to_string_integral() {
    assert_eq!(number_to_string(1.0), "1");
    assert_eq!(number_to_string(-3.0), "-3");
    assert_eq!(number_to_string(4294967295.0), "4294967295");
    assert_eq!(number_to_string(9007199254740991.0), "9007199254740991");
}

#[test]
fn test_number_to_string_fractional() {
    assert_eq!(number_to_string(2.5), "2.5");
    assert_eq!(number_to_string(-0.125), "-0.125");
}

#[quickcheck]
fn prop_u32_formats_as_decimal(i: u32) -> bool {
    number_to_string(i as f64) == i.to_string()
}

// ============================================================================
// NUMBER PARSING
// ============================================================================

#[test]
fn test_parse_number_decimal() {
    assert_eq!(parse_number("42"), 42.0);
    assert_eq!(parse_number("  -7 "), -7.0);
    assert_eq!(parse_number("2.5"), 2.5);
    assert_eq!(parse_number("1e3"), 1000.0);
    assert_eq!(parse_number(".5"), 0.5);
}

#[test]
fn test_parse_number_empty_and_hex() {
    assert_eq!(parse_number(""), 0.0);
    assert_eq!(parse_number("   "), 0.0);
    assert_eq!(parse_number("0x10"), 16.0);
    assert_eq!(parse_number("0XFF"), 255.0);
    assert!(parse_number("0x").is_nan());
    assert!(parse_number("0xg").is_nan());
}

#[test]
fn test_parse_number_rejects_rust_spellings() {
    assert!(parse_number("inf").is_nan());
    assert!(parse_number("nan").is_nan());
    assert!(parse_number("bananas").is_nan());
    assert_eq!(parse_number("Infinity"), f64::INFINITY);
    assert_eq!(parse_number("-Infinity"), f64::NEG_INFINITY);
}

#[quickcheck]
fn prop_parse_roundtrips_integers(i: i32) -> bool {
    parse_number(&i.to_string()) == i as f64
}

// ============================================================================
// TO-UINT32
// ============================================================================

#[test]
fn test_to_uint32() {
    assert_eq!(to_uint32(0.0), 0);
    assert_eq!(to_uint32(17.9), 17);
    assert_eq!(to_uint32(-1.0), u32::MAX);
    assert_eq!(to_uint32(4294967296.0), 0);
    assert_eq!(to_uint32(f64::NAN), 0);
    assert_eq!(to_uint32(f64::INFINITY), 0);
}

// ============================================================================
// VALUE COERCIONS
// ============================================================================

#[test]
fn test_value_to_number() {
    assert!(Value::Undefined.coerce_to_number().is_nan());
    assert_eq!(Value::Null.coerce_to_number(), 0.0);
    assert_eq!(Value::Bool(true).coerce_to_number(), 1.0);
    assert_eq!(Value::from("12").coerce_to_number(), 12.0);
    assert!(Value::from("x").coerce_to_number().is_nan());
    let obj = Value::Object(ObjectRef::default());
    assert!(obj.coerce_to_number().is_nan());
}

#[test]
fn test_value_to_string() {
    assert_eq!(Value::Undefined.coerce_to_string(), "undefined");
    assert_eq!(Value::Null.coerce_to_string(), "null");
    assert_eq!(Value::Bool(false).coerce_to_string(), "false");
    assert_eq!(Value::Number(-0.0).coerce_to_string(), "0");
    assert_eq!(Value::from("hi").coerce_to_string(), "hi");
}

#[test]
fn test_fold_case() {
    assert_eq!(fold_case("AbC"), "abc");
    let folded = Value::from("HeLLo").coerce_to_string_folded();
    assert_eq!(folded, "hello");
}

#[test]
fn test_strict_eq() {
    assert!(Value::Undefined.strict_eq(&Value::Undefined));
    assert!(!Value::Undefined.strict_eq(&Value::Null));
    assert!(Value::Number(0.0).strict_eq(&Value::Number(-0.0)));
    assert!(!Value::Number(f64::NAN).strict_eq(&Value::Number(f64::NAN)));
    assert!(Value::from("a").strict_eq(&Value::from("a")));

    let a = ObjectRef::default();
    let b = ObjectRef::default();
    assert!(Value::Object(a.clone()).strict_eq(&Value::Object(a.clone())));
    assert!(!Value::Object(a).strict_eq(&Value::Object(b)));
}

#[test]
fn test_get_prop_off_non_objects() {
    assert!(Value::Number(1.0).get_prop("x").is_undefined());
    assert!(!Value::from("s").has_prop("len"));
}

// ============================================================================
// DYNOBJECT
// ============================================================================

#[test]
fn test_dynobject_basics() {
    let mut obj = DynObject::new();
    assert!(obj.get("a").is_undefined());
    obj.set("a", Value::from(1.0));
    obj.set("b", Value::from(2.0));
    assert!(obj.has("a"));
    assert_eq!(obj.len(), 2);
    assert!(obj.delete("a"));
    assert!(!obj.delete("a"));
    assert!(!obj.has("a"));
}

#[test]
fn test_dynobject_preserves_insertion_order() {
    let mut obj = DynObject::new();
    obj.set("z", Value::Null);
    obj.set("a", Value::Null);
    obj.set("m", Value::Null);
    obj.delete("a");
    let keys: Vec<_> = obj.keys().map(|k| k.to_string()).collect();
    assert_eq!(keys, vec!["z", "m"]);
}

#[test]
fn test_objectref_sharing() {
    let obj = ObjectRef::default();
    let alias = obj.clone();
    alias.set_prop("x", Value::from(9.0));
    assert_eq!(obj.get_prop("x").coerce_to_number(), 9.0);
}

// ============================================================================
// INDEX COERCION
// ============================================================================

#[test]
fn test_index_from_u32() {
    assert_eq!(IndexKey::from_u32(0), IndexKey::Element(0));
    assert_eq!(IndexKey::from_u32(MAX_INDEX), IndexKey::Element(MAX_INDEX));
    assert_eq!(
        IndexKey::from_u32(u32::MAX),
        IndexKey::Property("4294967295".into())
    );
}

#[test]
fn test_index_from_i32() {
    assert_eq!(IndexKey::from_i32(5), IndexKey::Element(5));
    assert_eq!(IndexKey::from_i32(-1), IndexKey::Property("-1".into()));
}

#[test]
fn test_index_from_f64() {
    assert_eq!(IndexKey::from_f64(2.0), IndexKey::Element(2));
    assert_eq!(IndexKey::from_f64(-0.0), IndexKey::Element(0));
    assert_eq!(IndexKey::from_f64(2.5), IndexKey::Property("2.5".into()));
    assert_eq!(IndexKey::from_f64(-3.0), IndexKey::Property("-3".into()));
    assert_eq!(IndexKey::from_f64(f64::NAN), IndexKey::Property("NaN".into()));
    assert_eq!(
        IndexKey::from_f64(f64::INFINITY),
        IndexKey::Property("Infinity".into())
    );
    // The sentinel routes to the property table rather than being dropped.
    assert_eq!(
        IndexKey::from_f64(4294967295.0),
        IndexKey::Property("4294967295".into())
    );
    assert_eq!(
        IndexKey::from_f64(4294967296.0),
        IndexKey::Property("4294967296".into())
    );
}

#[test]
fn test_index_from_str() {
    assert_eq!(IndexKey::from_str_key("0"), IndexKey::Element(0));
    assert_eq!(IndexKey::from_str_key("7"), IndexKey::Element(7));
    assert_eq!(
        IndexKey::from_str_key("4294967294"),
        IndexKey::Element(MAX_INDEX)
    );
    assert_eq!(IndexKey::from_str_key("07"), IndexKey::Property("07".into()));
    assert_eq!(
        IndexKey::from_str_key("1.0"),
        IndexKey::Property("1.0".into())
    );
    assert_eq!(
        IndexKey::from_str_key(" 1"),
        IndexKey::Property(" 1".into())
    );
    assert_eq!(
        IndexKey::from_str_key("4294967295"),
        IndexKey::Property("4294967295".into())
    );
    assert_eq!(
        IndexKey::from_str_key("99999999999"),
        IndexKey::Property("99999999999".into())
    );
}

#[quickcheck]
fn prop_valid_floats_coerce_to_their_index(i: u32) -> bool {
    if i > MAX_INDEX {
        return true;
    }
    IndexKey::from_f64(i as f64) == IndexKey::Element(i)
}

#[quickcheck]
fn prop_index_string_roundtrip(i: u32) -> bool {
    if i > MAX_INDEX {
        return true;
    }
    IndexKey::from_str_key(&i.to_string()) == IndexKey::Element(i)
}

#[quickcheck]
fn prop_negative_ints_route_to_properties(i: i32) -> bool {
    if i >= 0 {
        return true;
    }
    matches!(IndexKey::from_i32(i), IndexKey::Property(ref s) if **s == *i.to_string())
}
