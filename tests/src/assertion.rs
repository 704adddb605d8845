//! Assertions checked against each step of a scenario.

use crate::error::{ScenarioError, ScenarioResult};
use crate::observed::Observed;
use ontic_core::{NodeId, Value};
use ontic_schema::SchemaError;

/// Node churn caused by one step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Churn {
    pub created: usize,
    pub deleted: usize,
}

type CustomCheck = Box<dyn Fn(&Observed) -> bool + Send + Sync>;

/// Expected outcome of a step.
#[derive(Default)]
pub struct Assertion {
    pub created: Option<usize>,
    pub deleted: Option<usize>,
    pub value: Option<Option<Value>>,
    pub nodes: Option<Vec<NodeId>>,
    pub names: Option<Vec<String>>,
    pub rows: Option<usize>,
    pub error: Option<String>,
    pub error_pattern: Option<String>,
    pub conflict: bool,
    pub custom: Option<CustomCheck>,
}

impl Assertion {
    pub fn new() -> Self {
        Self::default()
    }

    fn expects_error(&self) -> bool {
        self.error.is_some() || self.error_pattern.is_some() || self.conflict
    }

    /// Verify the assertion against a step's result and churn.
    pub fn verify(
        &self,
        step: &str,
        result: &Result<Observed, SchemaError>,
        churn: Churn,
    ) -> ScenarioResult<()> {
        if self.expects_error() {
            let error = match result {
                Err(error) => error,
                Ok(observed) => {
                    return Err(ScenarioError::assertion_failed(
                        step,
                        format!("expected an error, but step succeeded with {:?}", observed),
                    ))
                }
            };
            self.verify_error(step, error)?;
            // A failed step must leave nothing behind.
            return self.verify_churn(step, churn);
        }

        let observed = result
            .as_ref()
            .map_err(|e| ScenarioError::assertion_failed(step, format!("step failed: {}", e)))?;

        if let Some(ref custom) = self.custom {
            if !custom(observed) {
                return Err(ScenarioError::assertion_failed(step, "custom assertion failed"));
            }
        }

        self.verify_churn(step, churn)?;
        self.verify_observed(step, observed)
    }

    fn verify_error(&self, step: &str, error: &SchemaError) -> ScenarioResult<()> {
        let message = error.to_string();

        if self.conflict && error.conflict().is_none() {
            return Err(ScenarioError::assertion_failed(
                step,
                format!("expected a constraint conflict, got: {}", message),
            ));
        }

        if let Some(ref expected) = self.error {
            if !message.contains(expected.as_str()) {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!("expected error containing '{}', got: {}", expected, message),
                ));
            }
        }

        if let Some(ref pattern) = self.error_pattern {
            let re = regex_lite::Regex::new(pattern).map_err(|e| {
                ScenarioError::assertion_failed(step, format!("invalid regex pattern: {}", e))
            })?;
            if !re.is_match(&message) {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!("expected error matching '{}', got: {}", pattern, message),
                ));
            }
        }

        Ok(())
    }

    fn verify_churn(&self, step: &str, churn: Churn) -> ScenarioResult<()> {
        let expected_created = self.created.or(self.expects_error().then_some(0));
        if let Some(expected) = expected_created {
            if churn.created != expected {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!("expected {} created, got {}", expected, churn.created),
                ));
            }
        }

        let expected_deleted = self.deleted.or(self.expects_error().then_some(0));
        if let Some(expected) = expected_deleted {
            if churn.deleted != expected {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!("expected {} deleted, got {}", expected, churn.deleted),
                ));
            }
        }
        Ok(())
    }

    fn verify_observed(&self, step: &str, observed: &Observed) -> ScenarioResult<()> {
        if let Some(ref expected) = self.value {
            let actual = match observed {
                Observed::Value(value) => value,
                other => {
                    return Err(ScenarioError::assertion_failed(
                        step,
                        format!("expected a value, got {:?}", other),
                    ))
                }
            };
            if actual != expected {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!("expected value {:?}, got {:?}", expected, actual),
                ));
            }
        }

        if let Some(ref expected) = self.nodes {
            match observed {
                Observed::Nodes(actual) if actual == expected => {}
                other => {
                    return Err(ScenarioError::assertion_failed(
                        step,
                        format!("expected nodes {:?}, got {:?}", expected, other),
                    ))
                }
            }
        }

        if let Some(ref expected) = self.names {
            match observed {
                Observed::Names(actual) if actual == expected => {}
                other => {
                    return Err(ScenarioError::assertion_failed(
                        step,
                        format!("expected names {:?}, got {:?}", expected, other),
                    ))
                }
            }
        }

        if let Some(expected) = self.rows {
            if observed.len() != expected {
                return Err(ScenarioError::assertion_failed(
                    step,
                    format!("expected {} rows, got {}", expected, observed.len()),
                ));
            }
        }

        Ok(())
    }
}

/// Builder for fluent assertion construction.
pub struct AssertionBuilder {
    assertion: Assertion,
}

impl AssertionBuilder {
    pub fn new() -> Self {
        Self {
            assertion: Assertion::new(),
        }
    }

    pub fn build(self) -> Assertion {
        self.assertion
    }

    // ========== Churn assertions ==========

    /// Assert that N schema nodes were created.
    pub fn created(mut self, n: usize) -> Self {
        self.assertion.created = Some(n);
        self
    }

    /// Assert that N schema nodes were deleted.
    pub fn deleted(mut self, n: usize) -> Self {
        self.assertion.deleted = Some(n);
        self
    }

    /// Assert that the step changed no nodes.
    pub fn unchanged(self) -> Self {
        self.created(0).deleted(0)
    }

    // ========== Result assertions ==========

    /// Assert the step returned this scalar.
    pub fn value(mut self, v: impl Into<Value>) -> Self {
        self.assertion.value = Some(Some(v.into()));
        self
    }

    /// Assert the step found nothing.
    pub fn none(mut self) -> Self {
        self.assertion.value = Some(None);
        self
    }

    /// Assert the step returned a handle to this node.
    pub fn node(self, node: NodeId) -> Self {
        self.value(Value::NodeRef(node))
    }

    /// Assert the step returned exactly these nodes, in order.
    pub fn nodes(mut self, nodes: impl IntoIterator<Item = NodeId>) -> Self {
        self.assertion.nodes = Some(nodes.into_iter().collect());
        self
    }

    /// Assert the step returned exactly these names, in order.
    pub fn names(mut self, names: &[&str]) -> Self {
        self.assertion.names = Some(names.iter().map(|n| n.to_string()).collect());
        self
    }

    /// Assert the number of rows returned.
    pub fn rows(mut self, n: usize) -> Self {
        self.assertion.rows = Some(n);
        self
    }

    pub fn empty(self) -> Self {
        self.rows(0)
    }

    // ========== Error assertions ==========

    /// Assert that the step fails with an error containing the given string.
    pub fn error(mut self, contains: impl Into<String>) -> Self {
        self.assertion.error = Some(contains.into());
        self
    }

    /// Assert that the step fails with an error matching the given regex.
    pub fn error_matches(mut self, pattern: impl Into<String>) -> Self {
        self.assertion.error_pattern = Some(pattern.into());
        self
    }

    /// Assert that the step is rejected as a constraint conflict.
    pub fn conflict(mut self) -> Self {
        self.assertion.conflict = true;
        self
    }

    // ========== Advanced ==========

    /// Custom assertion function.
    pub fn assert_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&Observed) -> bool + Send + Sync + 'static,
    {
        self.assertion.custom = Some(Box::new(f));
        self
    }
}

impl Default for AssertionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== TEST: expected errors must happen ==========
    #[test]
    fn test_error_expected_but_succeeded() {
        let assertion = AssertionBuilder::new().error("cycle").build();
        let result = assertion.verify("step", &Ok(Observed::Unit), Churn::default());
        assert!(matches!(result, Err(ScenarioError::AssertionFailed { .. })));
    }

    // ========== TEST: failed steps imply no churn ==========
    #[test]
    fn test_error_with_churn_fails() {
        let assertion = AssertionBuilder::new().error_matches("^Not found").build();
        let error = Err(SchemaError::not_found("x"));
        let churn = Churn {
            created: 1,
            deleted: 0,
        };
        assert!(assertion.verify("step", &error, Churn::default()).is_ok());
        assert!(assertion.verify("step", &error, churn).is_err());
    }

    // ========== TEST: conflict assertion needs a conflict ==========
    #[test]
    fn test_conflict_requires_conflict_error() {
        let assertion = AssertionBuilder::new().conflict().build();
        let error = Err(SchemaError::invalid_argument("nope"));
        assert!(assertion.verify("step", &error, Churn::default()).is_err());
    }

    // ========== TEST: scalar comparison ==========
    #[test]
    fn test_value_and_rows() {
        let assertion = AssertionBuilder::new().value(3u32).rows(1).build();
        let observed = Ok(Observed::from(Some(3u32)));
        assert!(assertion.verify("step", &observed, Churn::default()).is_ok());

        let none = Ok(Observed::from(None::<u32>));
        assert!(assertion.verify("step", &none, Churn::default()).is_err());
    }
}
