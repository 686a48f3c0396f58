//! Tests for error handling

use konview_core::cache::CacheKind;
use konview_core::error::{KonviewError, KonviewResult};

#[test]
fn test_remote_evaluation_display()
{
    let error = KonviewError::RemoteEvaluation {
        expression: "(int)Konan_DebugGetFieldCount(0x1000)".to_string(),
        reason: "process is running".to_string(),
    };
    let message = format!("{}", error);
    assert!(message.contains("Konan_DebugGetFieldCount"));
    assert!(message.contains("process is running"));
}

#[test]
fn test_memory_read_display()
{
    let error = KonviewError::MemoryRead {
        address: 0xdead,
        reason: "unmapped".to_string(),
    };
    let message = format!("{}", error);
    assert!(message.contains("0xdead"));
    assert!(message.contains("unmapped"));
}

#[test]
fn test_malformed_shape_display()
{
    let error = KonviewError::MalformedShape {
        response: "3|3|a".to_string(),
        reason: "missing field kinds".to_string(),
    };
    let message = format!("{}", error);
    assert!(message.contains("3|3|a"));
    assert!(message.contains("missing field kinds"));
}

#[test]
fn test_unknown_primitive_kind_display()
{
    let message = format!("{}", KonviewError::UnknownPrimitiveKind(42));
    assert!(message.contains("42"));
}

#[test]
fn test_child_out_of_range_display()
{
    let message = format!("{}", KonviewError::ChildOutOfRange { index: 5, count: 2 });
    assert!(message.contains('5'));
    assert!(message.contains("count 2"));
}

#[test]
fn test_cache_not_clearable_display()
{
    let message = format!("{}", KonviewError::CacheNotClearable(CacheKind::TypeInfoExpr));
    assert!(message.contains("TypeInfoExpr"));
    assert!(message.contains("cannot be cleared"));
}

#[test]
fn test_invalid_argument_display()
{
    let error = KonviewError::InvalidArgument("test arg".to_string());
    let message = format!("{}", error);
    assert!(message.contains("Invalid argument"));
    assert!(message.contains("test arg"));
}

#[test]
fn test_result_type()
{
    // Test that Result type is properly aliased
    let _result: KonviewResult<()> = Ok(());
    let _error_result: KonviewResult<()> = Err(KonviewError::UnknownPrimitiveKind(11));
}
