//! # Diagnostic Commands
//!
//! Ad-hoc queries a debugger front end exposes next to the formatters:
//! symbol lookup by pattern or address, runtime type of a dotted field path,
//! and a listing of managed globals.
//!
//! These sit on top of the engine and only use [`Session::provide`],
//! [`Session::render`] and the runtime queries as black boxes.

use std::collections::HashSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::{KonviewError, KonviewResult};
use crate::eval;
use crate::host::Host;
use crate::provider::{NativeValue, SyntheticValue};
use crate::session::Session;
use crate::types::{Address, HostValue, Symbol};

/// Placeholder reported when a field path cannot be followed.
pub const NO_FIELD_FOUND: &str = "<NO_FIELD_FOUND>";

static GLOBAL_STORAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"kvar:(.*)#internal").expect("static regex"));
static GETTER_SIGNATURE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^kfun:<get-(.*)>\(\)(.*)$").expect("static regex"));

/// Symbols whose name matches `pattern` at its start, one per distinct name.
///
/// ## Errors
///
/// - `InvalidArgument`: `pattern` is not a valid regular expression
pub fn symbol_by_name<H: Host + ?Sized>(host: &H, pattern: &str) -> KonviewResult<Vec<Symbol>>
{
    let mask = Regex::new(pattern).map_err(|err| KonviewError::InvalidArgument(format!("bad pattern: {err}")))?;
    let mut visited = HashSet::new();
    Ok(host
        .symbols()
        .into_iter()
        .filter(|symbol| mask.find(symbol.name()).is_some_and(|m| m.start() == 0))
        .filter(|symbol| visited.insert(symbol.name().to_string()))
        .collect())
}

/// Symbols starting exactly at `address`.
pub fn type_by_address<H: Host + ?Sized>(host: &H, address: Address) -> Vec<Symbol>
{
    host.symbols().into_iter().filter(|symbol| symbol.address() == address).collect()
}

/// Runtime type of the value at a dotted path such as `foo.bar.baz`.
///
/// The first segment names a frame variable, the rest are followed through
/// the variables' providers. Any segment that does not resolve yields
/// [`NO_FIELD_FOUND`], as does a reference whose type name comes back empty.
/// Scalar fields report their primitive kind.
///
/// ## Errors
///
/// Remote failures while expanding an intermediate object.
pub fn field_type<H: Host + ?Sized>(session: &mut Session<'_, H>, path: &str) -> KonviewResult<String>
{
    let mut segments = path.split('.');
    let Some(root) = segments.next().filter(|s| !s.is_empty()) else {
        return Err(KonviewError::InvalidArgument("empty field path".to_string()));
    };

    let mut current = match session.host().find_variable(root) {
        Some(value) => Resolved::Value(value),
        None => return Ok(NO_FIELD_FOUND.to_string()),
    };

    for segment in segments {
        let Resolved::Value(value) = &current else {
            return Ok(NO_FIELD_FOUND.to_string());
        };
        let mut provider = session.provide(value)?;
        let Some(index) = provider.child_index(segment) else {
            debug!(path, segment, "field not found");
            return Ok(NO_FIELD_FOUND.to_string());
        };
        let child = provider.child_at(session, index)?;
        if !child.kind.is_reference() {
            current = Resolved::Kind(child.kind.to_string());
            continue;
        }
        current = match child.load(session)? {
            NativeValue::Reference(value) => Resolved::Value(value),
            NativeValue::Scalar(_) | NativeValue::Unrepresentable => Resolved::Kind(child.kind.to_string()),
        };
    }

    match current {
        Resolved::Kind(kind) => Ok(kind),
        Resolved::Value(value) if !value.is_managed() => Ok(value.type_name),
        Resolved::Value(value) if value.address().is_null() => Ok(NO_FIELD_FOUND.to_string()),
        Resolved::Value(value) => match session.runtime_type_name(value.address()) {
            Ok(name) if !name.is_empty() => Ok(name),
            Ok(_) => Ok(NO_FIELD_FOUND.to_string()),
            Err(err) => {
                debug!(path, %err, "runtime type name unavailable");
                Ok(NO_FIELD_FOUND.to_string())
            }
        },
    }
}

enum Resolved
{
    Value(HostValue),
    Kind(String),
}

/// One line of the globals listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobalReport
{
    /// A global and its rendered value.
    Value
    {
        /// Declared type, e.g. `kotlin.Int`
        type_name: String,
        /// Global name
        name: String,
        /// Rendered value
        value: String,
    },
    /// Storage exists but no getter was found.
    MissingStorage(String),
}

impl fmt::Display for GlobalReport
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            GlobalReport::Value { type_name, name, value } => write!(f, "{type_name} {name}: {value}"),
            GlobalReport::MissingStorage(name) => write!(f, "storage not found for name:{name}"),
        }
    }
}

/// How a primitive global's getter result is rendered.
#[derive(Clone, Copy)]
enum Extract
{
    Signed,
    Unsigned(u32),
    Text,
}

fn primitive_c_type(type_name: &str) -> Option<(&'static str, Extract)>
{
    Some(match type_name {
        "kotlin.Byte" => ("int8_t", Extract::Signed),
        "kotlin.Short" | "kotlin.Char" => ("short", Extract::Signed),
        "kotlin.Int" => ("int", Extract::Signed),
        "kotlin.Long" => ("long", Extract::Signed),
        "kotlin.UByte" => ("int8_t", Extract::Unsigned(8)),
        "kotlin.UShort" => ("short", Extract::Unsigned(16)),
        "kotlin.UInt" => ("int", Extract::Unsigned(32)),
        "kotlin.ULong" => ("long", Extract::Unsigned(64)),
        "kotlin.Boolean" => ("bool", Extract::Signed),
        "kotlin.Float" => ("float", Extract::Text),
        "kotlin.Double" => ("double", Extract::Text),
        _ => return None,
    })
}

/// List managed globals with their current values.
///
/// Globals are found through their storage symbols (`kvar:<name>#internal`)
/// and read by calling their getters (`kfun:<get-<name>>()<Type>`).
///
/// ## Errors
///
/// Remote failures while calling a getter or rendering its result.
pub fn globals<H: Host + ?Sized>(session: &mut Session<'_, H>) -> KonviewResult<Vec<GlobalReport>>
{
    let symbols = session.host().symbols();
    let mut visited = HashSet::new();
    let mut reports = Vec::new();

    for symbol in &symbols {
        let Some(name) = GLOBAL_STORAGE.captures(symbol.name()).and_then(|c| c.get(1)) else {
            continue;
        };
        let name = name.as_str();
        if !visited.insert(name.to_string()) {
            continue;
        }

        let getter_prefix = format!("kfun:<get-{name}>()");
        let Some(getter) = symbols.iter().find(|s| s.name().starts_with(&getter_prefix)) else {
            reports.push(GlobalReport::MissingStorage(name.to_string()));
            continue;
        };
        let Some(type_name) = GETTER_SIGNATURE.captures(getter.name()).and_then(|c| c.get(2)) else {
            reports.push(GlobalReport::MissingStorage(name.to_string()));
            continue;
        };
        let type_name = type_name.as_str().to_string();

        let value = match primitive_c_type(&type_name) {
            Some((c_type, extract)) => {
                let result = eval::evaluate(session.host(), &eval::call_getter(c_type, getter.address()))?;
                match extract {
                    Extract::Signed => result.signed.to_string(),
                    Extract::Unsigned(64) => result.unsigned.to_string(),
                    Extract::Unsigned(bits) => (result.unsigned & ((1u64 << bits) - 1)).to_string(),
                    Extract::Text => result.text.unwrap_or_else(|| result.signed.to_string()),
                }
            }
            None => {
                let result = eval::evaluate(session.host(), &eval::call_getter("ObjHeader *", getter.address()))?;
                let mut value = HostValue::reference(name, result.unsigned);
                if result.text.is_some() {
                    value.text = result.text;
                }
                session.render(&value)?
            }
        };
        reports.push(GlobalReport::Value {
            type_name,
            name: name.to_string(),
            value,
        });
    }
    Ok(reports)
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_global_storage_pattern()
    {
        let caps = GLOBAL_STORAGE.captures("kvar:counter#internal").unwrap();
        assert_eq!(&caps[1], "counter");
        assert!(GLOBAL_STORAGE.captures("kfun:main()").is_none());
    }

    #[test]
    fn test_getter_signature_pattern()
    {
        let caps = GETTER_SIGNATURE.captures("kfun:<get-counter>()kotlin.Int").unwrap();
        assert_eq!(&caps[1], "counter");
        assert_eq!(&caps[2], "kotlin.Int");
    }

    #[test]
    fn test_primitive_c_types()
    {
        assert!(matches!(primitive_c_type("kotlin.Int"), Some(("int", Extract::Signed))));
        assert!(matches!(primitive_c_type("kotlin.UByte"), Some(("int8_t", Extract::Unsigned(8)))));
        assert!(primitive_c_type("kotlin.String").is_none());
    }
}
