//! Expression builders: operation descriptors in, jq programs out.
//!
//! Builders are pure and deterministic; missing required fields and unknown
//! operation names fail here, before any subprocess is spawned.
//!
//! Caller-supplied literal values (keys, separators, search strings, merge
//! documents) are never spliced into filter text. They travel out-of-band as
//! `--arg`/`--argjson` bindings, so a crafted value cannot alter the
//! generated filter's semantics. Free-form filter text accepted by the
//! top-level query/transform/select tools is inherently an expression and is
//! passed through as-is.

pub mod array;
pub mod math;
pub mod object;
pub mod string;

/// A jq filter plus its out-of-band variable bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    filter: String,
    bindings: Vec<String>,
}

impl Program {
    /// A program with no bindings.
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            bindings: Vec::new(),
        }
    }

    /// Bind a string value as `--arg name value`. The value reaches the
    /// filter as `$name`, already quoted by jq.
    pub fn bind_str(mut self, name: &str, value: &str) -> Self {
        self.bindings.push("--arg".to_string());
        self.bindings.push(name.to_string());
        self.bindings.push(value.to_string());
        self
    }

    /// Bind a JSON-encoded value as `--argjson name value`.
    pub fn bind_json(mut self, name: &str, value: impl Into<String>) -> Self {
        self.bindings.push("--argjson".to_string());
        self.bindings.push(name.to_string());
        self.bindings.push(value.into());
        self
    }

    /// The filter text.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Final argument vector: flags, then bindings, then the filter.
    pub fn to_args(&self, flags: &[&str]) -> Vec<String> {
        let mut args: Vec<String> = flags.iter().map(|f| f.to_string()).collect();
        args.extend(self.bindings.iter().cloned());
        args.push(self.filter.clone());
        args
    }
}
