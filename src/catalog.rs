//! Prompt catalog: the categorized table of test cases sent to every backend.
//!
//! The built-in table is the default; a catalog can also be loaded from a
//! TOML, YAML or JSON file with the same shape:
//!
//! ```toml
//! [[categories]]
//! name = "simple"
//!
//! [[categories.tests]]
//! id = "S1"
//! prompt = "Write a function..."
//! category = "Code Generation"
//! expected_features = ["function"]
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EvalError;

/// Identifier given to ad-hoc prompts passed on the command line.
pub const CUSTOM_TEST_ID: &str = "CUSTOM";

/// One catalog entry: a prompt and its classification metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub prompt: String,
    /// Display category (e.g. "Code Generation"), distinct from the catalog key.
    pub category: String,
    #[serde(default)]
    pub expected_features: Vec<String>,
}

impl TestCase {
    pub fn new(
        id: impl Into<String>,
        prompt: impl Into<String>,
        category: impl Into<String>,
        expected_features: &[&str],
    ) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            category: category.into(),
            expected_features: expected_features.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Builds the synthetic test case used for a single ad-hoc prompt.
    pub fn custom(prompt: impl Into<String>) -> Self {
        Self::new(CUSTOM_TEST_ID, prompt, "Custom", &[])
    }
}

/// A named group of test cases, run together by `--category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub tests: Vec<TestCase>,
}

/// Ordered set of categories. Order is definition order and drives run order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    /// Creates a catalog after checking names and ids are unique.
    pub fn new(categories: Vec<Category>) -> Result<Self, EvalError> {
        let catalog = Self { categories };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Loads a catalog file, picking the format from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, EvalError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let catalog: Catalog = match ext.as_deref() {
            Some("toml") => toml::from_str(&contents)?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&contents)?,
            Some("json") => serde_json::from_str(&contents)?,
            _ => {
                return Err(EvalError::InvalidCatalog(format!(
                    "unsupported catalog format: {}",
                    path.display()
                )))
            }
        };
        catalog.validate()?;
        log::debug!(
            "Loaded catalog from {} ({} tests)",
            path.display(),
            catalog.total_tests()
        );
        Ok(catalog)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn names(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.name.clone()).collect()
    }

    pub fn category(&self, name: &str) -> Option<&[TestCase]> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.tests.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.category(name).is_some()
    }

    pub fn total_tests(&self) -> usize {
        self.categories.iter().map(|c| c.tests.len()).sum()
    }

    fn validate(&self) -> Result<(), EvalError> {
        if self.categories.is_empty() {
            return Err(EvalError::InvalidCatalog("no categories".to_string()));
        }
        let mut names = HashSet::new();
        let mut ids = HashSet::new();
        for category in &self.categories {
            if !names.insert(category.name.as_str()) {
                return Err(EvalError::InvalidCatalog(format!(
                    "duplicate category '{}'",
                    category.name
                )));
            }
            for test in &category.tests {
                if !ids.insert(test.id.as_str()) {
                    return Err(EvalError::InvalidCatalog(format!(
                        "duplicate test id '{}'",
                        test.id
                    )));
                }
            }
        }
        Ok(())
    }

    /// The stock prompt table.
    pub fn builtin() -> Self {
        let simple = vec![
            TestCase::new(
                "S1",
                "Write a Python function to check if a number is prime. Include error handling and type hints.",
                "Code Generation",
                &["function", "type hints", "error handling", "edge cases"],
            ),
            TestCase::new(
                "S2",
                "Create a function to reverse a string without using built-in reverse functions.",
                "Code Generation",
                &["function", "custom logic", "no built-ins"],
            ),
            TestCase::new(
                "S3",
                "Write a function to calculate factorial with recursion and iteration examples.",
                "Code Generation",
                &["two implementations", "comparison"],
            ),
            TestCase::new(
                "S4",
                "Explain what this code does:\n```python\ndef mystery(n):\n    return n if n <= 1 else n * mystery(n-1)\n```",
                "Code Explanation",
                &["identifies recursion", "explains factorial"],
            ),
            TestCase::new(
                "S5",
                "Write a docstring for this function:\n```python\ndef process_data(data, filter_func=None):\n    result = []\n    for item in data:\n        if filter_func is None or filter_func(item):\n            result.append(item * 2)\n    return result\n```",
                "Documentation",
                &["Args", "Returns", "description"],
            ),
        ];

        let medium = vec![
            TestCase::new(
                "M1",
                "Create a Python class for a shopping cart that supports adding items, removing items, calculating total, and applying discount codes.",
                "Code Generation",
                &["class", "methods", "error handling", "docstrings"],
            ),
            TestCase::new(
                "M2",
                "Implement a rate limiter decorator that allows maximum N calls per M seconds.",
                "Code Generation",
                &["decorator", "time tracking", "thread-safe"],
            ),
            TestCase::new(
                "M3",
                "Write a function to merge two sorted lists into one sorted list without using built-in sort.",
                "Code Generation",
                &["merge logic", "efficiency", "type hints"],
            ),
            TestCase::new(
                "M4",
                "Create a context manager for database connections with automatic rollback on errors.",
                "Code Generation",
                &["__enter__", "__exit__", "error handling"],
            ),
            TestCase::new(
                "M5",
                "Refactor this code to be more Pythonic:\n```python\nresult = []\nfor i in range(len(numbers)):\n    if numbers[i] % 2 == 0:\n        result.append(numbers[i] * 2)\nreturn result\n```",
                "Refactoring",
                &["list comprehension", "explanation"],
            ),
        ];

        let complex = vec![
            TestCase::new(
                "C1",
                "Implement a LRU (Least Recently Used) cache in Python with O(1) get and put operations.",
                "Code Generation",
                &["OrderedDict or custom", "O(1) complexity", "explanation"],
            ),
            TestCase::new(
                "C2",
                "Create a REST API client class for GitHub that handles authentication, rate limiting, and retries.",
                "Code Generation",
                &["class", "auth", "error handling", "retries"],
            ),
            TestCase::new(
                "C3",
                "Design and implement a task queue system with priority support using Python.",
                "Code Generation",
                &["priority queue", "threading", "error handling"],
            ),
            TestCase::new(
                "C4",
                "Write a function to detect cycles in a directed graph. Include explanation of the algorithm.",
                "Code Generation",
                &["DFS", "visited tracking", "algorithm explanation"],
            ),
            TestCase::new(
                "C5",
                "Create a README.md for a Python project that includes: description, installation, usage, examples, and API documentation.",
                "Documentation",
                &["markdown", "sections", "examples"],
            ),
        ];

        let debugging = vec![
            TestCase::new(
                "D1",
                "Find the bug in this code:\n```python\ndef get_average(numbers):\n    total = 0\n    for num in numbers:\n        total += num\n    return total / len(numbers)\n```",
                "Debugging",
                &["identifies empty list issue", "provides fix"],
            ),
            TestCase::new(
                "D2",
                "Why is this code slow and how can it be optimized?\n```python\ndef find_duplicates(lst):\n    duplicates = []\n    for i in range(len(lst)):\n        for j in range(i+1, len(lst)):\n            if lst[i] == lst[j] and lst[i] not in duplicates:\n                duplicates.append(lst[i])\n    return duplicates\n```",
                "Debugging",
                &["identifies O(n²)", "suggests set/dict", "provides optimized code"],
            ),
            TestCase::new(
                "D3",
                "This code has a memory leak. Identify and fix it:\n```python\nclass DataProcessor:\n    cache = []\n    \n    def process(self, data):\n        self.cache.append(data)\n        return len(self.cache)\n```",
                "Debugging",
                &["identifies class variable issue", "suggests instance variable"],
            ),
        ];

        let nhs_specific = vec![
            TestCase::new(
                "N1",
                "Create a Python function to validate NHS numbers (10 digits with check digit validation).",
                "Code Generation",
                &["validation logic", "check digit algorithm", "error handling"],
            ),
            TestCase::new(
                "N2",
                "Write a function to parse and validate FHIR Patient resources according to the FHIR R4 specification.",
                "Code Generation",
                &["FHIR knowledge", "validation", "error messages"],
            ),
        ];

        Self {
            categories: vec![
                Category {
                    name: "simple".to_string(),
                    tests: simple,
                },
                Category {
                    name: "medium".to_string(),
                    tests: medium,
                },
                Category {
                    name: "complex".to_string(),
                    tests: complex,
                },
                Category {
                    name: "debugging".to_string(),
                    tests: debugging,
                },
                Category {
                    name: "nhs_specific".to_string(),
                    tests: nhs_specific,
                },
            ],
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
