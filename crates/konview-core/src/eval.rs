//! # Remote Evaluator
//!
//! Expression builders for the runtime support entry points, and the checked
//! evaluation helper every component goes through.
//!
//! The engine compiles in no knowledge of the managed runtime's object
//! layout. Everything it learns comes from calling `Konan_Debug*` functions
//! inside the stopped process, and those calls are plain expression strings
//! handed to [`Host::evaluate`]. Keeping every expression here keeps the
//! protocol in one place.

use tracing::trace;

use crate::error::{KonviewError, KonviewResult};
use crate::host::{EvalResult, Host};
use crate::types::{Address, TAG_MASK};

/// Evaluate `expression`, turning an invalid result into an error.
///
/// ## Errors
///
/// - `RemoteEvaluation`: the host reported the result as invalid
pub fn evaluate<H: Host + ?Sized>(host: &H, expression: &str) -> KonviewResult<EvalResult>
{
    let result = evaluate_unchecked(host, expression);
    if result.valid {
        Ok(result)
    } else {
        Err(KonviewError::RemoteEvaluation {
            expression: expression.to_string(),
            reason: "evaluator returned an invalid result".to_string(),
        })
    }
}

/// Evaluate `expression` and hand back the raw result, valid or not.
///
/// For callers that fold an invalid result into their own outcome instead of
/// failing.
pub fn evaluate_unchecked<H: Host + ?Sized>(host: &H, expression: &str) -> EvalResult
{
    let result = host.evaluate(expression);
    trace!(expression, valid = result.valid, unsigned = result.unsigned, "remote evaluation");
    result
}

/// Self-reference test yielding the type descriptor of the object at `address`.
///
/// Objects store a (tagged) pointer to their descriptor as the first word, and
/// descriptors store their own address as their first word. The expression
/// evaluates to the descriptor when `*object == **object` after masking the
/// tag bits, and to zero otherwise.
pub fn type_info_check(address: Address) -> String
{
    let descriptor = format!("((uintptr_t)(*(void**){address}) & ~{TAG_MASK:#x})");
    format!("*(void **){descriptor} == **(void***){descriptor} ? *(void **){descriptor} : (void *)0")
}

/// Composite shape query, answered as `disc|arg|...`.
pub fn complete_type_init_flow(address: Address, string_class: Address) -> String
{
    format!("(char *)Konan_DebugCompleteTypeInitFlow({address}, {string_class})")
}

/// Deferred element metadata of an array, answered as `types|addresses`.
pub fn fields_type_and_address(address: Address, count: usize) -> String
{
    format!("(char *)Konan_DebugGetFieldsTypeAndAddress({address}, {count:#x})")
}

/// Number of fields (or elements) of an object.
pub fn field_count(address: Address) -> String
{
    format!("(int)Konan_DebugGetFieldCount({address})")
}

/// Dynamic instance-of check against a type descriptor.
pub fn is_instance(address: Address, descriptor: Address) -> String
{
    format!("(bool)Konan_DebugIsInstance({address}, {descriptor})")
}

/// Runtime type name of an object.
pub fn type_name(address: Address) -> String
{
    format!("(char *)Konan_DebugGetTypeName({address})")
}

/// Call a parameterless getter at `address` returning `c_type`.
pub fn call_getter(c_type: &str, address: Address) -> String
{
    format!("(({c_type} (*)()){address})()")
}
