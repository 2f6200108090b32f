use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Prefix of responses recorded when a backend call failed.
pub const ERROR_PREFIX: &str = "ERROR";
/// Prefix of responses recorded when a backend was not queried.
pub const SKIPPED_PREFIX: &str = "SKIPPED";

/// Outcome of one prompt sent to one backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Generated text, or an `ERROR: ...` / `SKIPPED - ...` sentinel.
    pub response: String,
    /// Tokens consumed as reported by the backend, 0 when unknown.
    pub tokens: u64,
    /// Wall-clock seconds spent on the network call.
    pub time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl QueryResult {
    pub fn success(
        response: impl Into<String>,
        tokens: u64,
        time: f64,
        model: impl Into<String>,
    ) -> Self {
        Self {
            response: response.into(),
            tokens,
            time,
            model: Some(model.into()),
        }
    }

    /// A backend that was not queried, e.g. `SKIPPED - No API key`.
    pub fn skipped(reason: &str) -> Self {
        Self::sentinel(format!("{SKIPPED_PREFIX} - {reason}"))
    }

    /// A failed call, e.g. `ERROR: HTTP 500`.
    pub fn error(err: impl fmt::Display) -> Self {
        Self::sentinel(format!("{ERROR_PREFIX}: {err}"))
    }

    fn sentinel(response: String) -> Self {
        Self {
            response,
            tokens: 0,
            time: 0.0,
            model: None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.response.starts_with(SKIPPED_PREFIX)
    }

    pub fn is_error(&self) -> bool {
        self.response.starts_with(ERROR_PREFIX)
    }

    /// True when the response carries no generated content.
    pub fn is_sentinel(&self) -> bool {
        self.is_error() || self.is_skipped()
    }
}

/// Backend name to result, kept in the order backends were queried.
///
/// Serialized as a JSON object so downstream tools can index by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Responses(Vec<(String, QueryResult)>);

impl Responses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a result, replacing any earlier one for the same backend.
    pub fn insert(&mut self, name: impl Into<String>, result: QueryResult) {
        let name = name.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = result,
            None => self.0.push((name, result)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&QueryResult> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryResult)> {
        self.0.iter().map(|(n, r)| (n.as_str(), r))
    }
}

impl Serialize for Responses {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, result) in &self.0 {
            map.serialize_entry(name, result)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Responses {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ResponsesVisitor;

        impl<'de> Visitor<'de> for ResponsesVisitor {
            type Value = Responses;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of backend name to query result")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Responses, A::Error> {
                let mut responses = Responses::new();
                while let Some((name, result)) = access.next_entry::<String, QueryResult>()? {
                    responses.insert(name, result);
                }
                Ok(responses)
            }
        }

        deserializer.deserialize_map(ResponsesVisitor)
    }
}

/// Every backend's answer to one test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub test_id: String,
    pub prompt: String,
    pub category: String,
    /// ISO-8601 local time the test started.
    pub timestamp: String,
    pub responses: Responses,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub timestamp: String,
    pub total_tests: usize,
    /// Backend names in invocation order.
    pub systems: Vec<String>,
}

/// Layout of the JSON results file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub metadata: RunMetadata,
    pub results: Vec<TestResult>,
}

/// Progress notifications emitted while a run is in flight.
#[derive(Debug, Clone, Copy)]
pub enum RunEvent<'a> {
    /// A catalog category is about to run.
    CategoryStarted { name: &'a str, tests: usize },
    TestStarted { test: &'a crate::catalog::TestCase },
    BackendStarted { backend: &'a str },
    BackendFinished {
        backend: &'a str,
        result: &'a QueryResult,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_zero_out_usage() {
        let skipped = QueryResult::skipped("No API key");
        assert_eq!(skipped.response, "SKIPPED - No API key");
        assert_eq!(skipped.tokens, 0);
        assert_eq!(skipped.time, 0.0);
        assert!(skipped.is_skipped() && skipped.is_sentinel());

        let error = QueryResult::error("HTTP 500");
        assert_eq!(error.response, "ERROR: HTTP 500");
        assert!(error.is_error() && !error.is_skipped());
    }

    #[test]
    fn generated_text_is_not_a_sentinel() {
        let ok = QueryResult::success("def f(): pass", 12, 0.5, "gpt-4-turbo");
        assert!(!ok.is_sentinel());
    }

    #[test]
    fn model_is_omitted_when_absent() {
        let json = serde_json::to_value(QueryResult::skipped("API not available")).unwrap();
        assert!(json.get("model").is_none());
        assert_eq!(json["tokens"], 0);
    }

    #[test]
    fn responses_keep_insertion_order() {
        let mut responses = Responses::new();
        responses.insert("Zeta", QueryResult::skipped("No API key"));
        responses.insert("Alpha", QueryResult::error("boom"));
        responses.insert("Mid", QueryResult::success("ok", 1, 0.1, "m"));

        let json = serde_json::to_string(&responses).unwrap();
        let zeta = json.find("Zeta").unwrap();
        let alpha = json.find("Alpha").unwrap();
        let mid = json.find("Mid").unwrap();
        assert!(zeta < alpha && alpha < mid);

        let back: Responses = serde_json::from_str(&json).unwrap();
        assert_eq!(back.names().collect::<Vec<_>>(), vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn insert_replaces_existing_backend() {
        let mut responses = Responses::new();
        responses.insert("Grok", QueryResult::skipped("API not available"));
        responses.insert("Grok", QueryResult::error("late"));
        assert_eq!(responses.len(), 1);
        assert!(responses.get("Grok").unwrap().is_error());
    }
}
