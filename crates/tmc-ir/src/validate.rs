//! Schema validation boundary.
//!
//! The external contract is `validate(doc, schema) -> Result`; the
//! builder invokes it after each document is built and any failure is
//! fatal. [`IrValidator`] is the built-in implementation: it enforces
//! required fields, id shapes, and score ranges. A caller with real
//! JSON-schema files can supply its own [`SchemaValidator`].

use serde_json::Value;

use tmc_error::{Error, Result};

/// Validates one serialized IR document against a named schema.
pub trait SchemaValidator {
    fn validate(&self, doc: &Value, schema: &str) -> Result<()>;
}

/// Built-in structural validator for the IR documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct IrValidator;

impl SchemaValidator for IrValidator {
    fn validate(&self, doc: &Value, schema: &str) -> Result<()> {
        match schema {
            "project" => validate_project(doc),
            "environment" => validate_environment(doc),
            "targets" => validate_targets(doc),
            "suite" => validate_suite(doc),
            "test" => validate_test(doc),
            "data" => validate_data(doc),
            other => Err(Error::schema_validation(format!("unknown schema '{other}'"))
                .with_operation("ir::validate")),
        }
    }
}

fn fail(schema: &str, message: impl Into<String>) -> Error {
    Error::schema_validation(format!("{schema}: {}", message.into())).with_operation("ir::validate")
}

fn require<'v>(doc: &'v Value, key: &str, schema: &str) -> Result<&'v Value> {
    doc.get(key)
        .ok_or_else(|| fail(schema, format!("missing required field '{key}'")))
}

fn require_str<'v>(doc: &'v Value, key: &str, schema: &str) -> Result<&'v str> {
    require(doc, key, schema)?
        .as_str()
        .ok_or_else(|| fail(schema, format!("field '{key}' must be a string")))
}

fn require_array<'v>(doc: &'v Value, key: &str, schema: &str) -> Result<&'v Vec<Value>> {
    require(doc, key, schema)?
        .as_array()
        .ok_or_else(|| fail(schema, format!("field '{key}' must be an array")))
}

fn validate_project(doc: &Value) -> Result<()> {
    for key in ["irVersion", "projectName", "sourceFramework", "targetFramework"] {
        let value = require_str(doc, key, "project")?;
        if value.is_empty() {
            return Err(fail("project", format!("field '{key}' must be non-empty")));
        }
    }
    require_str(doc, "architecturePattern", "project")?;
    require(doc, "supportsParallel", "project")?;
    require(doc, "createdOn", "project")?;
    Ok(())
}

fn validate_environment(doc: &Value) -> Result<()> {
    require(doc, "baseUrls", "environment")?;
    require_str(doc, "executionMode", "environment")?;
    require_array(doc, "browsers", "environment")?;
    let timeouts = require(doc, "timeouts", "environment")?;
    for key in ["implicit", "explicit", "pageLoad"] {
        require(timeouts, key, "environment")?
            .as_u64()
            .ok_or_else(|| fail("environment", format!("timeouts.{key} must be a non-negative integer")))?;
    }
    let retry = require(doc, "retryPolicy", "environment")?;
    require(retry, "enabled", "environment")?;
    require(retry, "maxRetries", "environment")?;
    Ok(())
}

fn validate_targets(doc: &Value) -> Result<()> {
    let targets = doc
        .as_array()
        .ok_or_else(|| fail("targets", "document must be an array"))?;
    for target in targets {
        let id = require_str(target, "targetId", "targets")?;
        if id.len() != 12 || !id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()) {
            return Err(fail(
                "targets",
                format!("targetId '{id}' is not 12 lowercase hex characters"),
            ));
        }
        require_str(target, "type", "targets")?;
        require(target, "context", "targets")?;
        require(target, "semantic", "targets")?;
        require_str(target, "preferredStrategy", "targets")?;
        let strategies = require_array(target, "selectorStrategies", "targets")?;
        if strategies.is_empty() {
            return Err(fail("targets", format!("target '{id}' has no selector strategies")));
        }
        for strategy in strategies {
            require_str(strategy, "strategy", "targets")?;
            require_str(strategy, "value", "targets")?;
            let score = require(strategy, "stabilityScore", "targets")?
                .as_f64()
                .ok_or_else(|| fail("targets", "stabilityScore must be a number"))?;
            if !(0.0..=1.0).contains(&score) {
                return Err(fail(
                    "targets",
                    format!("stabilityScore {score} outside [0, 1] on target '{id}'"),
                ));
            }
        }
    }
    Ok(())
}

fn validate_suite(doc: &Value) -> Result<()> {
    require_str(doc, "suiteId", "suite")?;
    require_str(doc, "description", "suite")?;
    require_array(doc, "tests", "suite")?;
    Ok(())
}

fn validate_test(doc: &Value) -> Result<()> {
    require_str(doc, "testId", "test")?;
    require_str(doc, "suiteId", "test")?;
    require_str(doc, "priority", "test")?;
    require_str(doc, "severity", "test")?;
    for step in require_array(doc, "steps", "test")? {
        require_str(step, "stepId", "test")?;
        require_str(step, "action", "test")?;
        // targetId is nullable but must be present.
        require(step, "targetId", "test")?;
    }
    for assertion in require_array(doc, "assertions", "test")? {
        require_str(assertion, "assertId", "test")?;
        require_str(assertion, "type", "test")?;
        let actual = require(assertion, "actual", "test")?;
        require_str(actual, "source", "test")?;
    }
    Ok(())
}

fn validate_data(doc: &Value) -> Result<()> {
    require_str(doc, "dataSetId", "data")?;
    require_str(doc, "type", "data")?;
    require_array(doc, "records", "data")?;
    Ok(())
}
