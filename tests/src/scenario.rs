//! Scenario definition and runner.

use std::collections::HashSet;

use ontic_core::NodeId;
use ontic_schema::{MetaModel, MetaTx, ModelConfig, Schema, SchemaResult};

use crate::assertion::{Assertion, AssertionBuilder, Churn};
use crate::error::{ScenarioError, ScenarioResult};
use crate::observed::Observed;

/// Builds part of the ontology a scenario starts from.
pub type Ontology = fn(&mut MetaTx<'_>) -> SchemaResult<()>;

type WriteAction = Box<dyn Fn(&mut MetaTx<'_>) -> SchemaResult<Observed>>;
type ModelAction = Box<dyn Fn(&MetaModel) -> SchemaResult<Observed>>;
type ReadAction = Box<dyn Fn(Schema<'_>) -> SchemaResult<Observed>>;

enum Action {
    /// Runs in its own transaction, committed on success.
    Write(WriteAction),
    /// Drives the model directly, for operations that manage their own
    /// transaction.
    Model(ModelAction),
    /// Runs against a read snapshot.
    Read(ReadAction),
}

struct Step {
    name: String,
    action: Action,
    assertion: Assertion,
}

/// A named sequence of steps over a fresh model.
pub struct Scenario {
    name: String,
    config: ModelConfig,
    ontologies: Vec<Ontology>,
    steps: Vec<Step>,
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: ModelConfig::default(),
            ontologies: Vec::new(),
            steps: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Use this configuration for the model.
    pub fn config(mut self, config: ModelConfig) -> Self {
        self.config = config;
        self
    }

    /// Build an ontology before the first step. Ontologies are built in
    /// the order they are added, each in its own transaction.
    pub fn ontology(mut self, build: Ontology) -> Self {
        self.ontologies.push(build);
        self
    }

    /// Add a step that runs in a transaction.
    pub fn step<R, F, A>(self, name: &str, action: F, assertion: A) -> Self
    where
        R: Into<Observed>,
        F: Fn(&mut MetaTx<'_>) -> SchemaResult<R> + 'static,
        A: FnOnce(AssertionBuilder) -> AssertionBuilder,
    {
        let action: WriteAction = Box::new(move |tx: &mut MetaTx<'_>| action(tx).map(Into::into));
        self.push(name, Action::Write(action), assertion)
    }

    /// Add a step that drives the model directly.
    pub fn model_step<R, F, A>(self, name: &str, action: F, assertion: A) -> Self
    where
        R: Into<Observed>,
        F: Fn(&MetaModel) -> SchemaResult<R> + 'static,
        A: FnOnce(AssertionBuilder) -> AssertionBuilder,
    {
        let action: ModelAction = Box::new(move |model: &MetaModel| action(model).map(Into::into));
        self.push(name, Action::Model(action), assertion)
    }

    /// Add a read-only step.
    pub fn query<R, F, A>(self, name: &str, action: F, assertion: A) -> Self
    where
        R: Into<Observed>,
        F: Fn(Schema<'_>) -> SchemaResult<R> + 'static,
        A: FnOnce(AssertionBuilder) -> AssertionBuilder,
    {
        let action: ReadAction = Box::new(move |schema: Schema<'_>| action(schema).map(Into::into));
        self.push(name, Action::Read(action), assertion)
    }

    fn push<A>(mut self, name: &str, action: Action, assertion: A) -> Self
    where
        A: FnOnce(AssertionBuilder) -> AssertionBuilder,
    {
        self.steps.push(Step {
            name: name.to_string(),
            action,
            assertion: assertion(AssertionBuilder::new()).build(),
        });
        self
    }

    /// Run the scenario on a fresh model and hand the model back.
    pub fn run(&self) -> ScenarioResult<MetaModel> {
        let model = MetaModel::with_config(self.config.clone());
        self.run_on(&model)?;
        Ok(model)
    }

    /// Run the scenario on an existing model.
    pub fn run_on(&self, model: &MetaModel) -> ScenarioResult<()> {
        self.execute(model)
            .map_err(|e| e.in_scenario(self.name.as_str()))
    }

    fn execute(&self, model: &MetaModel) -> ScenarioResult<()> {
        for build in &self.ontologies {
            model.write(|tx| build(tx)).map_err(ScenarioError::Setup)?;
        }

        for step in &self.steps {
            let before = node_set(model);
            let result = match &step.action {
                Action::Write(action) => model.write(|tx| action(tx)),
                Action::Model(action) => action(model),
                Action::Read(action) => {
                    let view = model.read();
                    action(view.schema())
                }
            };
            let churn = churn(&before, &node_set(model));
            step.assertion.verify(&step.name, &result, churn)?;
        }
        Ok(())
    }
}

fn node_set(model: &MetaModel) -> HashSet<NodeId> {
    let view = model.read();
    let nodes = view.schema().store().node_ids().collect();
    nodes
}

fn churn(before: &HashSet<NodeId>, after: &HashSet<NodeId>) -> Churn {
    Churn {
        created: after.difference(before).count(),
        deleted: before.difference(after).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== TEST: failures name the scenario and step ==========
    #[test]
    fn test_failure_is_reported_in_scenario() {
        let scenario = Scenario::new("naming").step(
            "duplicate",
            |tx| {
                tx.create_namespace("foaf")?;
                tx.create_namespace("foaf")
            },
            |a| a.created(1),
        );

        let error = scenario.run().err().map(|e| e.to_string());
        let error = error.unwrap_or_default();
        assert!(error.starts_with("Scenario 'naming'"), "{}", error);
        assert!(error.contains("Step 'duplicate'"), "{}", error);
    }

    // ========== TEST: churn counts created and deleted nodes ==========
    #[test]
    fn test_churn_is_measured_per_step() {
        Scenario::new("churn")
            .step("create", |tx| tx.create_namespace("a"), |a| a.created(1))
            .step(
                "replace",
                |tx| {
                    let a = tx.namespace("a", false)?;
                    if let Some(a) = a {
                        tx.delete_namespace(a)?;
                    }
                    tx.create_namespace("b")
                },
                |a| a.created(1).deleted(1),
            )
            .query("read", |schema| Ok(schema.namespaces()), |a| a.rows(2).unchanged())
            .run()
            .unwrap();
    }
}
