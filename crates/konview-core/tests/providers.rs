//! Tests for string, array and object providers

mod common;

use common::{reference, shape_query, MockHost};
use konview_core::cache::CacheKind;
use konview_core::eval;
use konview_core::prelude::*;
use konview_core::provider::UNREPRESENTABLE_MARKER;

fn elements_query(address: u64, count: usize) -> String
{
    eval::fields_type_and_address(Address::new(address), count)
}

fn int_at(host: MockHost, address: u64, value: i64) -> MockHost
{
    let expression = PrimitiveKind::Int32.load_expression(Address::new(address)).unwrap();
    host.answer(expression, EvalResult::from_signed(value))
}

#[test]
fn test_string_is_decoded_and_cached()
{
    let host = MockHost::new().object(0x1000, "1|0x4000|5").memory(0x4000, "hello");
    let mut session = Session::new(&host);

    let mut provider = session.provide(&reference(0x1000)).unwrap();
    assert_eq!(provider.kind_name(), "string");
    assert_eq!(provider.child_count(&mut session).unwrap(), 0);
    assert!(!provider.has_children());
    assert_eq!(provider.short_summary(&mut session).unwrap(), "hello");
    assert_eq!(provider.full_summary(&mut session).unwrap(), "hello");
    assert_eq!(session.cache().len(CacheKind::DecodedString), 1);
    assert!(matches!(
        provider.child_at(&mut session, 0),
        Err(KonviewError::ChildOutOfRange { index: 0, count: 0 })
    ));
}

#[test]
fn test_zero_length_string_uses_host_text()
{
    let host = MockHost::new().object(0x1000, "1|0|0");
    let mut session = Session::new(&host);

    let mut value = reference(0x1000);
    value.text = Some("0x0000000000001000".to_string());
    assert_eq!(session.render(&value).unwrap(), "0x0000000000001000");
    assert_eq!(session.cache().len(CacheKind::DecodedString), 0);
}

#[test]
fn test_array_metadata_fetched_once()
{
    let host = MockHost::new()
        .object(0x1000, "2|3")
        .string_answer(elements_query(0x1000, 3), "4,4,4|0x200,0x204,0x208");
    let host = int_at(int_at(int_at(host, 0x200, 1), 0x204, 2), 0x208, 3);
    let mut session = Session::new(&host);

    let mut provider = session.provide(&reference(0x1000)).unwrap();
    let Provider::Array(array) = &provider else {
        panic!("expected array provider, got {}", provider.kind_name());
    };
    assert!(!array.is_materialized());
    assert_eq!(host.calls(&elements_query(0x1000, 3)), 0);

    for index in 0..3 {
        let child = provider.child_at(&mut session, index).unwrap();
        assert_eq!(child.name, index.to_string());
        assert_eq!(child.kind, PrimitiveKind::Int32);
    }
    provider.child_at(&mut session, 2).unwrap();
    assert_eq!(host.calls(&elements_query(0x1000, 3)), 1);

    assert_eq!(provider.full_summary(&mut session).unwrap(), "[1, 2, 3]");
    assert_eq!(host.calls(&elements_query(0x1000, 3)), 1);
}

#[test]
fn test_array_child_index_and_bounds()
{
    let host = MockHost::new().object(0x1000, "2|3");
    let mut session = Session::new(&host);

    let mut provider = session.provide(&reference(0x1000)).unwrap();
    assert_eq!(provider.child_index("1"), Some(1));
    assert_eq!(provider.child_index("3"), None);
    assert_eq!(provider.child_index("size"), None);
    assert!(matches!(
        provider.child_at(&mut session, 3),
        Err(KonviewError::ChildOutOfRange { index: 3, count: 3 })
    ));
    // Out of range is rejected before any metadata round trip.
    assert_eq!(host.calls(&elements_query(0x1000, 3)), 0);
}

#[test]
fn test_zero_count_array_requeries_count()
{
    let host = MockHost::new()
        .object(0x1000, "2|0")
        .answer(eval::field_count(Address::new(0x1000)), EvalResult::from_signed(2));
    let mut session = Session::new(&host);

    let mut provider = session.provide(&reference(0x1000)).unwrap();
    assert_eq!(provider.child_count(&mut session).unwrap(), 2);
    assert_eq!(host.calls(&eval::field_count(Address::new(0x1000))), 1);
}

#[test]
fn test_empty_array_summary()
{
    let host = MockHost::new()
        .object(0x1000, "2|0")
        .answer(eval::field_count(Address::new(0x1000)), EvalResult::from_signed(0));
    let mut session = Session::new(&host);

    assert_eq!(session.render(&reference(0x1000)).unwrap(), "[]");
    assert_eq!(session.render_full(&reference(0x1000)).unwrap(), "[]");
}

#[test]
fn test_empty_object_keeps_reported_count()
{
    let host = MockHost::new()
        .object(0x1000, "3|0|||")
        .answer(eval::field_count(Address::new(0x1000)), EvalResult::from_signed(2));
    let mut session = Session::new(&host);

    let mut provider = session.provide(&reference(0x1000)).unwrap();
    assert!(matches!(provider, Provider::Object(_)));
    assert_eq!(provider.child_count(&mut session).unwrap(), 0);
    assert!(!provider.has_children());
    assert_eq!(host.calls(&eval::field_count(Address::new(0x1000))), 0);
}

#[test]
fn test_malformed_array_elements_fail_child_access()
{
    let host = MockHost::new()
        .object(0x1000, "2|3")
        .string_answer(elements_query(0x1000, 3), "4,4|0x200,0x204");
    let mut session = Session::new(&host);

    let mut provider = session.provide(&reference(0x1000)).unwrap();
    assert!(matches!(
        provider.child_at(&mut session, 0),
        Err(KonviewError::MalformedShape { .. })
    ));
}

#[test]
fn test_summaries_truncate_at_max_children()
{
    let host = MockHost::new()
        .max_children(2)
        .object(0x1000, "2|5")
        .object(0x2000, "3|5|a,b,c,d,e|4,4,4,4,4|0x100,0x104,0x108,0x10c,0x110")
        .string_answer(elements_query(0x1000, 5), "4,4,4,4,4|0x200,0x204,0x208,0x20c,0x210");
    let host = int_at(int_at(host, 0x200, 10), 0x204, 20);
    let host = int_at(int_at(host, 0x100, 1), 0x104, 2);
    let mut session = Session::new(&host);

    assert_eq!(session.render(&reference(0x1000)).unwrap(), "[..., ..., ...]");
    assert_eq!(session.render_full(&reference(0x1000)).unwrap(), "[10, 20, ...]");
    assert_eq!(session.render(&reference(0x2000)).unwrap(), "a: ..., b: ..., ...");
    assert_eq!(session.render_full(&reference(0x2000)).unwrap(), "[a: 1, b: 2, ...]");

    // Elements past the cap are never loaded.
    let hidden = PrimitiveKind::Int32.load_expression(Address::new(0x208)).unwrap();
    assert_eq!(host.calls(&hidden), 0);
}

#[test]
fn test_summaries_without_truncation()
{
    let host = int_at(MockHost::new().object(0x1000, "3|1|x|4|0x100"), 0x100, 42);
    let mut session = Session::new(&host);

    assert_eq!(session.render(&reference(0x1000)).unwrap(), "x: ...");
    assert_eq!(session.render_full(&reference(0x1000)).unwrap(), "[x: 42]");
}

#[test]
fn test_nested_reference_renders_short()
{
    let inner_load = PrimitiveKind::SelfType.load_expression(Address::new(0x300)).unwrap();
    let host = MockHost::new()
        .object(0x1000, "3|1|next|1|0x300")
        .answer(inner_load, EvalResult::from_unsigned(0x2000))
        .object(0x2000, "3|1|v|4|0x400");
    let mut session = Session::new(&host);

    assert_eq!(session.render_full(&reference(0x1000)).unwrap(), "[next: v: ...]");

    let mut provider = session.provide(&reference(0x1000)).unwrap();
    let child = provider.child_at(&mut session, 0).unwrap();
    let NativeValue::Reference(next) = child.load(&mut session).unwrap() else {
        panic!("expected a reference child");
    };
    assert_eq!(next.name, "next");
    assert_eq!(next.address(), Address::new(0x2000));
}

#[test]
fn test_null_child_reference_renders_null()
{
    let inner_load = PrimitiveKind::SelfType.load_expression(Address::new(0x300)).unwrap();
    let host = MockHost::new()
        .object(0x1000, "3|1|next|1|0x300")
        .answer(inner_load, EvalResult::from_unsigned(0));
    let mut session = Session::new(&host);

    assert_eq!(session.render_full(&reference(0x1000)).unwrap(), "[next: null]");
}

#[test]
fn test_untyped_and_unrepresentable_children()
{
    let host = MockHost::new().object(0x1000, "3|2|raw,blob|0,10|0x500,0x508");
    let mut session = Session::new(&host);

    let expected = format!("[raw: 0x0000000000000500, blob: {UNREPRESENTABLE_MARKER}]");
    assert_eq!(session.render_full(&reference(0x1000)).unwrap(), expected);
    // Neither child needs a round trip.
    assert_eq!(host.total_calls(), 2);
}

#[test]
fn test_object_revisit_clears_string_reads()
{
    let host = MockHost::new().object(0x1000, "3|2|f0,f1|4,4|0x100,0x104");
    let mut session = Session::new(&host);

    let mut provider = session.provide(&reference(0x1000)).unwrap();
    assert!(session.cache().contains(CacheKind::ReadString, &shape_query(0x1000)));

    assert_eq!(provider.child_count(&mut session).unwrap(), 2);
    assert_eq!(session.cache().len(CacheKind::ReadString), 1);

    assert_eq!(provider.child_count(&mut session).unwrap(), 2);
    assert_eq!(session.cache().len(CacheKind::ReadString), 0);
    // Only the string-read cache is affected.
    assert_eq!(session.cache().len(CacheKind::TypeInfoExpr), 1);

    // The next render re-reads the shape answer.
    session.render(&reference(0x1000)).unwrap();
    assert_eq!(host.calls(&shape_query(0x1000)), 2);
}

#[test]
fn test_failed_child_load_propagates()
{
    let host = MockHost::new().object(0x1000, "3|1|x|4|0x100");
    let mut session = Session::new(&host);

    let err = session.render_full(&reference(0x1000)).unwrap_err();
    assert!(matches!(err, KonviewError::RemoteEvaluation { .. }));
}
