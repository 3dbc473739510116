use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Static API key exchanged for a session token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Short-lived token returned by the auth service. Never empty.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.is_empty() { None } else { Some(Self(value)) }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

/// Two validated city names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonQuery {
    city_a: String,
    city_b: String,
}

impl ComparisonQuery {
    pub fn new(city_a: &str, city_b: &str) -> Result<Self> {
        let city_a = city_a.trim();
        let city_b = city_b.trim();

        if city_a.is_empty() || city_b.is_empty() {
            return Err(Error::Validation("Both city names are required.".into()));
        }

        Ok(Self {
            city_a: city_a.to_string(),
            city_b: city_b.to_string(),
        })
    }

    pub fn city_a(&self) -> &str {
        &self.city_a
    }

    pub fn city_b(&self) -> &str {
        &self.city_b
    }

    /// Natural-language instruction sent to the comparison function.
    pub fn instruction(&self) -> String {
        format!(
            "Compare the weather in {} and {} for the next three days, output this in a markdown table so it looks clean. \
             Also give a section on any insights you have, or can make from the data, \
             and give a fun intresting fact about both cities",
            self.city_a, self.city_b
        )
    }
}

/// JSON body of the function-execution request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionRequest<'a> {
    pub query: String,
    pub function: &'a str,
}

/// Parsed response of the comparison function, kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComparisonResult(Value);

impl ComparisonResult {
    pub fn new(body: Value) -> Self {
        Self(body)
    }

    /// Markdown answer, if the service returned a non-empty one.
    pub fn answer(&self) -> Option<&str> {
        self.0
            .get("answer")
            .and_then(Value::as_str)
            .filter(|answer| !answer.is_empty())
    }

    pub fn body(&self) -> &Value {
        &self.0
    }
}
