//! Parameter sets and their encoding into engine command-line arguments.

use std::fmt;

/// A single parameter value before encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Absent,
    Scalar(String),
    List(Vec<String>),
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::Scalar(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Scalar(v.to_string())
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(v: Vec<String>) -> Self {
        Self::List(v)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Self::Absent)
    }
}

/// Ordered mapping of parameter names to values. Iteration order is insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    entries: Vec<(String, ParamValue)>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. Re-inserting a name replaces its value in place.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encode into engine arguments. Absent entries are skipped; list entries repeat the flag.
    pub fn encode(&self) -> EncodedArguments {
        let mut args = Vec::new();
        for (name, value) in self.iter() {
            match value {
                ParamValue::Absent => {}
                ParamValue::Scalar(v) => args.push(Argument::new(name, v)),
                ParamValue::List(items) => {
                    args.extend(items.iter().map(|v| Argument::new(name, v)));
                }
            }
        }
        EncodedArguments { args }
    }
}

/// One `--name "value"` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub name: String,
    pub value: String,
}

impl Argument {
    fn new(name: &str, value: &str) -> Self {
        Self { name: name.to_string(), value: value.to_string() }
    }

    pub fn flag(&self) -> String {
        format!("--{}", self.name)
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Values are written verbatim; embedded quotes are not escaped.
        write!(f, "--{} \"{}\"", self.name, self.value)
    }
}

/// Encoded engine arguments.
///
/// `Display` renders the shell form (`--a "b" --c "d"`), `to_argv` the raw
/// argument vector handed to the child process without any shell in between.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedArguments {
    args: Vec<Argument>,
}

impl EncodedArguments {
    pub fn iter(&self) -> std::slice::Iter<'_, Argument> {
        self.args.iter()
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn to_argv(&self) -> Vec<String> {
        self.args
            .iter()
            .flat_map(|a| [a.flag(), a.value.clone()])
            .collect()
    }
}

impl fmt::Display for EncodedArguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", arg)?;
        }
        Ok(())
    }
}
