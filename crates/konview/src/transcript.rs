//! # Transcripts
//!
//! A recorded stop of a process: everything a live debugger would have
//! answered, written down one record per line. [`TranscriptHost`] replays it
//! through the engine's [`Host`] trait.
//!
//! ```text
//! # comments and blank lines are ignored
//! setting max-children 16
//! eval <expression> => invalid
//! eval <expression> => <number> [text]
//! mem <address> <text>
//! sym <address> <name>
//! var <name> <raw> <static type>
//! ```
//!
//! Numbers are decimal or `0x`-prefixed hex; a leading `-` makes an
//! evaluation result signed. The host's text for a result is the optional
//! trailing label, or else the number as written. Expressions not in the
//! transcript evaluate as invalid, just like a call the live process could
//! not run.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use konview_core::types::OBJ_HEADER_TYPE;
use konview_core::{Address, EvalResult, Host, HostValue, KonviewError, KonviewResult, Symbol};
use konview_utils::debug;

use crate::error::{CliError, CliResult};

/// Host's default maximum-children setting.
pub const DEFAULT_MAX_CHILDREN: usize = 256;

/// A [`Host`] answering from a parsed transcript.
#[derive(Debug, Clone)]
pub struct TranscriptHost
{
    answers: HashMap<String, EvalResult>,
    memory: HashMap<Address, String>,
    symbols: Vec<Symbol>,
    variables: HashMap<String, HostValue>,
    max_children: usize,
}

impl TranscriptHost
{
    /// Read and parse the transcript at `path`.
    ///
    /// ## Errors
    ///
    /// - `TranscriptIo`: the file could not be read
    /// - `TranscriptParse`: a line did not follow the record grammar
    pub fn load(path: &Path) -> CliResult<Self>
    {
        let text = fs::read_to_string(path).map_err(|source| CliError::TranscriptIo {
            path: path.to_path_buf(),
            source,
        })?;
        text.parse()
    }

    /// Look up a recorded variable.
    ///
    /// ## Errors
    ///
    /// - `UnknownVariable`: no `var` record has this name
    pub fn variable(&self, name: &str) -> CliResult<HostValue>
    {
        self.find_variable(name)
            .ok_or_else(|| CliError::UnknownVariable(name.to_string()))
    }

    fn record(&mut self, line: &str) -> Result<(), String>
    {
        let (keyword, rest) = line.split_once(' ').unwrap_or((line, ""));
        match keyword {
            "eval" => {
                let (expression, answer) = rest
                    .rsplit_once(" => ")
                    .ok_or("eval record needs `<expression> => <answer>`")?;
                self.answers.insert(expression.trim().to_string(), parse_answer(answer.trim())?);
            }
            "mem" => {
                let (address, text) = rest.split_once(' ').unwrap_or((rest, ""));
                self.memory.insert(parse_address(address)?, text.to_string());
            }
            "sym" => {
                let (address, name) = rest.split_once(' ').ok_or("sym record needs `<address> <name>`")?;
                self.symbols.push(Symbol::new(name.trim(), parse_address(address)?));
            }
            "var" => {
                let mut parts = rest.splitn(3, ' ');
                let (Some(name), Some(raw), Some(type_name)) = (parts.next(), parts.next(), parts.next()) else {
                    return Err("var record needs `<name> <raw> <static type>`".to_string());
                };
                let raw = parse_address(raw)?.value();
                let value = if type_name.trim() == OBJ_HEADER_TYPE {
                    HostValue::reference(name, raw)
                } else {
                    HostValue::scalar(name, type_name.trim(), raw, Some(raw.to_string()))
                };
                self.variables.insert(name.to_string(), value);
            }
            "setting" => match rest.split_once(' ') {
                Some(("max-children", value)) => {
                    self.max_children = value
                        .trim()
                        .parse()
                        .map_err(|_| format!("max-children `{value}` is not a count"))?;
                }
                _ => return Err(format!("unknown setting `{rest}`")),
            },
            other => return Err(format!("unknown record `{other}`")),
        }
        Ok(())
    }
}

impl Default for TranscriptHost
{
    fn default() -> Self
    {
        Self {
            answers: HashMap::new(),
            memory: HashMap::new(),
            symbols: Vec::new(),
            variables: HashMap::new(),
            max_children: DEFAULT_MAX_CHILDREN,
        }
    }
}

impl std::str::FromStr for TranscriptHost
{
    type Err = CliError;

    fn from_str(text: &str) -> CliResult<Self>
    {
        let mut host = Self::default();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim_end();
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            host.record(line.trim_start())
                .map_err(|reason| CliError::TranscriptParse { line: index + 1, reason })?;
        }
        debug!(
            answers = host.answers.len(),
            symbols = host.symbols.len(),
            variables = host.variables.len(),
            "loaded transcript"
        );
        Ok(host)
    }
}

fn parse_address(text: &str) -> Result<Address, String>
{
    Address::parse(text).ok_or_else(|| format!("`{text}` is not an address"))
}

fn parse_answer(text: &str) -> Result<EvalResult, String>
{
    if text == "invalid" {
        return Ok(EvalResult::invalid());
    }
    let (number, label) = match text.split_once(' ') {
        Some((number, label)) => (number, Some(label)),
        None => (text, None),
    };
    let mut result = match number.strip_prefix('-') {
        Some(magnitude) => {
            let magnitude = parse_address(magnitude)?.value();
            let value = i64::try_from(magnitude).map_err(|_| format!("`{number}` does not fit in 64 bits"))?;
            EvalResult::from_signed(-value)
        }
        None => EvalResult::from_unsigned(parse_address(number)?.value()),
    };
    result.text = Some(label.unwrap_or(number).to_string());
    Ok(result)
}

impl Host for TranscriptHost
{
    fn evaluate(&self, expression: &str) -> EvalResult
    {
        match self.answers.get(expression) {
            Some(result) => result.clone(),
            None => {
                debug!(expression, "no recorded answer, evaluating as invalid");
                EvalResult::invalid()
            }
        }
    }

    fn read_cstring(&self, address: Address, max_len: u32) -> KonviewResult<String>
    {
        let text = self.memory.get(&address).ok_or_else(|| KonviewError::MemoryRead {
            address: address.value(),
            reason: "address not recorded in transcript".to_string(),
        })?;
        Ok(text.chars().take(max_len as usize).collect())
    }

    fn max_children(&self) -> KonviewResult<usize>
    {
        Ok(self.max_children)
    }

    fn symbols(&self) -> Vec<Symbol>
    {
        self.symbols.clone()
    }

    fn find_variable(&self, name: &str) -> Option<HostValue>
    {
        self.variables.get(name).cloned()
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    const DEMO: &str = include_str!("../demos/point.transcript");

    #[test]
    fn test_parse_demo_transcript()
    {
        let host: TranscriptHost = DEMO.parse().unwrap();
        assert_eq!(host.max_children().unwrap(), 16);
        assert!(host.variable("point").unwrap().is_managed());
        assert!(!host.variable("count").unwrap().is_managed());
        assert!(host.symbol_address("kclass:kotlin.String").is_some());
    }

    #[test]
    fn test_parse_answers()
    {
        assert_eq!(parse_answer("invalid").unwrap(), EvalResult::invalid());
        assert_eq!(parse_answer("0x10").unwrap(), EvalResult::from_unsigned(0x10));
        assert_eq!(parse_answer("-5").unwrap().signed, -5);
        let labelled = parse_answer("1 true").unwrap();
        assert_eq!(labelled.unsigned, 1);
        assert_eq!(labelled.text.as_deref(), Some("true"));
        assert!(parse_answer("many").is_err());
    }

    #[test]
    fn test_expression_with_equality_operator()
    {
        let host: TranscriptHost = "eval (a == b) ? 1 : 0 => 0x1".parse().unwrap();
        assert!(host.evaluate("(a == b) ? 1 : 0").valid);
        assert!(!host.evaluate("(a == c) ? 1 : 0").valid);
    }

    #[test]
    fn test_bad_line_reports_line_number()
    {
        let err = "# header\nsetting max-children many".parse::<TranscriptHost>().unwrap_err();
        assert!(matches!(err, CliError::TranscriptParse { line: 2, .. }));
        assert!("bogus record".parse::<TranscriptHost>().is_err());
    }

    #[test]
    fn test_memory_reads_are_bounded()
    {
        let host: TranscriptHost = "mem 0x40 hello world".parse().unwrap();
        assert_eq!(host.read_cstring(Address::new(0x40), 5).unwrap(), "hello");
        assert!(host.read_cstring(Address::new(0x41), 5).is_err());
    }

    #[test]
    fn test_unknown_variable()
    {
        let host = TranscriptHost::default();
        assert!(matches!(host.variable("x"), Err(CliError::UnknownVariable(_))));
    }
}
