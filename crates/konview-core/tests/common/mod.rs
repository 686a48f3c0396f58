//! Shared test host: canned answers plus call counting.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use konview_core::eval;
use konview_core::{Address, EvalResult, Host, HostValue, KonviewError, KonviewResult, Symbol};

/// A host answering from fixed tables and recording every evaluation.
pub struct MockHost
{
    answers: HashMap<String, EvalResult>,
    memory: HashMap<u64, String>,
    symbols: Vec<Symbol>,
    variables: HashMap<String, HostValue>,
    max_children: usize,
    next_string: Cell<u64>,
    calls: RefCell<HashMap<String, usize>>,
}

impl MockHost
{
    pub fn new() -> Self
    {
        Self {
            answers: HashMap::new(),
            memory: HashMap::new(),
            symbols: Vec::new(),
            variables: HashMap::new(),
            max_children: 10,
            next_string: Cell::new(0x9000_0000),
            calls: RefCell::new(HashMap::new()),
        }
    }

    pub fn answer(mut self, expression: impl Into<String>, result: EvalResult) -> Self
    {
        self.answers.insert(expression.into(), result);
        self
    }

    pub fn memory(mut self, address: u64, text: impl Into<String>) -> Self
    {
        self.memory.insert(address, text.into());
        self
    }

    /// Answer `expression` with a pointer to a C string holding `text`.
    pub fn string_answer(self, expression: impl Into<String>, text: impl Into<String>) -> Self
    {
        let address = self.next_string.get();
        self.next_string.set(address + 0x100);
        self.answer(expression, EvalResult::from_unsigned(address)).memory(address, text)
    }

    /// Make the object at `address` classify with `descriptor`.
    pub fn typed(self, address: u64, descriptor: u64) -> Self
    {
        let expression = eval::type_info_check(Address::new(address));
        self.answer(expression, EvalResult::from_unsigned(descriptor))
    }

    /// Make the object at `address` typed and answer its shape query.
    pub fn object(self, address: u64, shape: &str) -> Self
    {
        self.typed(address, 0xd000).string_answer(shape_query(address), shape)
    }

    pub fn symbol(mut self, name: &str, address: u64) -> Self
    {
        self.symbols.push(Symbol::new(name, Address::new(address)));
        self
    }

    pub fn variable(mut self, value: HostValue) -> Self
    {
        self.variables.insert(value.name.clone(), value);
        self
    }

    pub fn max_children(mut self, cap: usize) -> Self
    {
        self.max_children = cap;
        self
    }

    /// Number of times `expression` was evaluated.
    pub fn calls(&self, expression: &str) -> usize
    {
        self.calls.borrow().get(expression).copied().unwrap_or(0)
    }

    /// Number of evaluations of any expression.
    pub fn total_calls(&self) -> usize
    {
        self.calls.borrow().values().sum()
    }
}

impl Host for MockHost
{
    fn evaluate(&self, expression: &str) -> EvalResult
    {
        *self.calls.borrow_mut().entry(expression.to_string()).or_insert(0) += 1;
        self.answers.get(expression).cloned().unwrap_or_else(EvalResult::invalid)
    }

    fn read_cstring(&self, address: Address, max_len: u32) -> KonviewResult<String>
    {
        match self.memory.get(&address.value()) {
            Some(text) => Ok(text.chars().take(max_len as usize).collect()),
            None => Err(KonviewError::MemoryRead {
                address: address.value(),
                reason: "unmapped".to_string(),
            }),
        }
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

/// Composite shape query for `address` when no string class symbol exists.
pub fn shape_query(address: u64) -> String
{
    eval::complete_type_init_flow(Address::new(address), Address::ZERO)
}

pub fn reference(raw: u64) -> HostValue
{
    HostValue::reference("obj", raw)
}
