//! IR builder and linker.
//!
//! Construction order is load-bearing:
//!
//! 1. project and environment documents from configuration;
//! 2. raw targets normalized into a de-duplicated, `(page, name)`-sorted
//!    list with deterministic ids;
//! 3. the name-to-id (and locator-node-to-id) maps;
//! 4. suites and data sets;
//! 5. tests, with the second resolution pass that turns every step's
//!    symbolic `target_name_id` into a `targetId` from step 2.
//!
//! A step whose symbolic name cannot be resolved is not an error: the
//! step is emitted with a null target and a warning. A test referencing
//! an unknown suite is fatal, as is a deterministic-id collision.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use tmc_error::{Error, Result};
use tmc_extract::{
    DataSourceKind, Diagnostics, FileExtraction, RawDataSource, RawStep, RawStepKind, RawSuite,
    RawTarget, RawTest,
};
use tmc_symbol::LocatorStrategy;

use crate::config::ProjectConfig;
use crate::doc::{
    AssertionIr, DataBinding, DataSource, EnvironmentIr, InputBinding, IrBundle, ProjectIr,
    SelectorStrategy, SourceKind, StepIr, StepTarget, SuiteIr, TargetContext, TargetIr,
    TargetSemantic, TestDataIr, TestIr, IR_VERSION,
};
use crate::id::{assert_id, data_set_id, step_id, suite_id, target_id, test_id};
use crate::validate::{IrValidator, SchemaValidator};

/// Suite that adopts tests whose declaring class is unknown.
const DEFAULT_SUITE: &str = "Default";

/// Default stability score per strategy kind.
fn stability_score(strategy: LocatorStrategy) -> f64 {
    match strategy {
        LocatorStrategy::Id => 0.98,
        LocatorStrategy::Css => 0.95,
        LocatorStrategy::Name => 0.90,
        LocatorStrategy::ClassName => 0.85,
        LocatorStrategy::Xpath => 0.80,
        LocatorStrategy::LinkText => 0.70,
        LocatorStrategy::PartialLinkText => 0.65,
        LocatorStrategy::TagName => 0.60,
    }
}

/// Builds and links the typed IR for one project.
pub struct IrBuilder<'a> {
    config: &'a ProjectConfig,
    validator: Box<dyn SchemaValidator>,
}

/// Resolution maps shared by the test-construction pass.
struct TargetMaps {
    /// Symbolic name -> targetId (first sorted occurrence wins).
    by_name: BTreeMap<String, String>,
    /// Locator node id -> targetId.
    by_node: HashMap<String, String>,
    /// targetId -> primary selector value, for step target detail.
    selector_of: HashMap<String, String>,
}

impl<'a> IrBuilder<'a> {
    pub fn new(config: &'a ProjectConfig) -> Self {
        Self {
            config,
            validator: Box::new(IrValidator),
        }
    }

    /// Swap in an external schema validator.
    pub fn with_validator(mut self, validator: Box<dyn SchemaValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// Assemble the full bundle from per-file extractions.
    ///
    /// Extractions must arrive in a stable order (the batch orchestrator
    /// sorts files before fan-out); everything else is deterministic.
    pub fn build(&self, extractions: Vec<FileExtraction>) -> Result<IrBundle> {
        self.config.validate()?;
        let mut diagnostics = Diagnostics::new();

        let project = ProjectIr {
            ir_version: IR_VERSION.to_string(),
            project_name: self.config.project_name.clone(),
            source_framework: self.config.source_framework.clone(),
            target_framework: self.config.target_framework.clone(),
            architecture_pattern: self.config.architecture_pattern.clone(),
            supports_parallel: self.config.supports_parallel,
            created_on: self
                .config
                .created_on
                .clone()
                .unwrap_or_else(|| "1970-01-01T00:00:00Z".to_string()),
        };
        self.validate_doc(&project, "project")?;

        let environment = EnvironmentIr {
            base_urls: self.config.environments.base_urls.clone(),
            execution_mode: self.config.environments.execution_mode.clone(),
            browsers: self.config.environments.browsers.clone(),
            timeouts: self.config.environments.timeouts,
            retry_policy: self.config.environments.retry_policy,
        };
        self.validate_doc(&environment, "environment")?;

        let mut raw_targets = Vec::new();
        let mut raw_suites = Vec::new();
        let mut raw_tests = Vec::new();
        for extraction in extractions {
            diagnostics.extend(extraction.diagnostics);
            raw_targets.extend(extraction.targets);
            raw_suites.extend(extraction.suites);
            raw_tests.extend(extraction.tests);
        }

        let (targets, maps) = self.normalize_targets(raw_targets)?;
        self.validate_doc(&targets, "targets")?;

        let suites = self.build_suites(&raw_suites, &raw_tests);
        for suite in &suites {
            self.validate_doc(suite, "suite")?;
        }

        let data_sets = self.build_data_sets();
        for data_set in &data_sets {
            self.validate_doc(data_set, "data")?;
        }

        let mut tests = Vec::new();
        for raw in &raw_tests {
            let test = self.build_test(raw, &suites, &maps, &mut diagnostics)?;
            self.validate_doc(&test, "test")?;
            tests.push(test);
        }

        info!(
            project = %project.project_name,
            targets = targets.len(),
            suites = suites.len(),
            tests = tests.len(),
            warnings = diagnostics.warning_count(),
            "IR bundle built"
        );

        Ok(IrBundle {
            project,
            environment,
            targets,
            suites,
            tests,
            data_sets,
            diagnostics,
        })
    }

    fn validate_doc<T: Serialize>(&self, doc: &T, schema: &str) -> Result<()> {
        let value = serde_json::to_value(doc).map_err(|err| {
            Error::serialization_failed(format!("could not serialize {schema} document"))
                .with_operation("ir::build")
                .set_source(err)
        })?;
        self.validator.validate(&value, schema)
    }

    /// Normalize raw targets: de-duplicate by `(page, name)`, assign
    /// deterministic ids, sort, and build the resolution maps.
    fn normalize_targets(&self, raw: Vec<RawTarget>) -> Result<(Vec<TargetIr>, TargetMaps)> {
        // First occurrence per (page, name) wins; every occurrence's
        // locator node still resolves to the surviving target.
        let mut unique: BTreeMap<(String, String), RawTarget> = BTreeMap::new();
        let mut node_keys: Vec<(String, (String, String))> = Vec::new();
        for target in raw {
            let key = (
                target.page.clone().unwrap_or_default(),
                target.name.clone(),
            );
            node_keys.push((target.node_id.clone(), key.clone()));
            unique.entry(key).or_insert(target);
        }

        let mut targets = Vec::with_capacity(unique.len());
        let mut id_of_key: HashMap<(String, String), String> = HashMap::new();
        let mut owner_of_id: HashMap<String, (String, String)> = HashMap::new();
        let mut maps = TargetMaps {
            by_name: BTreeMap::new(),
            by_node: HashMap::new(),
            selector_of: HashMap::new(),
        };

        for ((page, name), target) in &unique {
            let id = target_id(
                page,
                name,
                &target.strategy.to_string(),
                &target.locator_value,
            );
            if let Some(previous) = owner_of_id.insert(id.clone(), (page.clone(), name.clone())) {
                return Err(Error::id_collision(&id)
                    .with_operation("ir::normalize_targets")
                    .with_context("first", format!("{}.{}", previous.0, previous.1))
                    .with_context("second", format!("{page}.{name}")));
            }

            maps.by_name.entry(name.clone()).or_insert_with(|| id.clone());
            maps.selector_of
                .insert(id.clone(), target.locator_value.clone());
            id_of_key.insert((page.clone(), name.clone()), id.clone());

            targets.push(TargetIr {
                target_id: id,
                kind: "element".to_string(),
                context: TargetContext {
                    page: target.page.clone(),
                    component: None,
                    frame: None,
                },
                semantic: TargetSemantic {
                    role: infer_role(name).map(str::to_string),
                    business_name: Some(humanize(name)),
                },
                selector_strategies: vec![SelectorStrategy {
                    strategy: target.strategy,
                    value: target.locator_value.clone(),
                    stability_score: stability_score(target.strategy),
                }],
                preferred_strategy: target.strategy,
            });
        }

        for (node_id, key) in node_keys {
            if let Some(id) = id_of_key.get(&key) {
                maps.by_node.insert(node_id, id.clone());
            }
        }

        debug!(targets = targets.len(), "targets normalized");
        Ok((targets, maps))
    }

    /// Suites merged by name across files, plus the default suite when
    /// any test needs adopting.
    fn build_suites(&self, raw_suites: &[RawSuite], raw_tests: &[RawTest]) -> Vec<SuiteIr> {
        let mut merged: BTreeMap<String, SuiteIr> = BTreeMap::new();

        for raw in raw_suites {
            let entry = merged.entry(raw.name.clone()).or_insert_with(|| SuiteIr {
                suite_id: suite_id(&raw.name),
                description: raw
                    .description
                    .clone()
                    .unwrap_or_else(|| format!("Tests migrated from {}", raw.name)),
                tests: Vec::new(),
            });
            for test_name in &raw.tests {
                let id = test_id(&raw.name, test_name);
                if !entry.tests.contains(&id) {
                    entry.tests.push(id);
                }
            }
        }

        if raw_tests.iter().any(|t| t.suite_hint.is_none()) {
            let entry = merged
                .entry(DEFAULT_SUITE.to_string())
                .or_insert_with(|| SuiteIr {
                    suite_id: suite_id(DEFAULT_SUITE),
                    description: "Tests without a declaring class".to_string(),
                    tests: Vec::new(),
                });
            for raw in raw_tests.iter().filter(|t| t.suite_hint.is_none()) {
                let id = test_id(DEFAULT_SUITE, &raw.name);
                if !entry.tests.contains(&id) {
                    entry.tests.push(id);
                }
            }
        }

        merged.into_values().collect()
    }

    fn build_data_sets(&self) -> Vec<TestDataIr> {
        self.config
            .data_sets
            .iter()
            .map(|set| TestDataIr {
                data_set_id: data_set_id(&set.name),
                kind: set.kind.clone(),
                records: set.records.clone(),
            })
            .collect()
    }

    fn build_test(
        &self,
        raw: &RawTest,
        suites: &[SuiteIr],
        maps: &TargetMaps,
        diagnostics: &mut Diagnostics,
    ) -> Result<TestIr> {
        let suite_name = raw.suite_hint.as_deref().unwrap_or(DEFAULT_SUITE);
        let sid = suite_id(suite_name);
        if !suites.iter().any(|s| s.suite_id == sid) {
            return Err(Error::reference(suite_name)
                .with_operation("ir::build_test")
                .with_context("test", raw.name.clone())
                .with_context("file", raw.file_path.clone()));
        }

        let mut steps = Vec::new();
        let mut assertions = Vec::new();
        for raw_step in &raw.steps {
            match raw_step.kind {
                RawStepKind::Action => {
                    let step = self.build_step(raw_step, steps.len() + 1, raw, maps, diagnostics);
                    steps.push(step);
                }
                RawStepKind::Assertion => {
                    let assertion =
                        self.build_assertion(raw_step, assertions.len() + 1, raw, maps, diagnostics);
                    assertions.push(assertion);
                }
            }
        }

        let data_binding = self.config.data_sets.iter().find_map(|set| {
            set.tests.iter().any(|t| t == &raw.name).then(|| DataBinding {
                data_set_id: data_set_id(&set.name),
                iteration_strategy: set.iteration_strategy.clone(),
            })
        });

        Ok(TestIr {
            test_id: test_id(suite_name, &raw.name),
            suite_id: sid,
            priority: "medium".to_string(),
            severity: "normal".to_string(),
            data_binding,
            steps,
            assertions,
            tags: raw.tags.clone(),
        })
    }

    fn build_step(
        &self,
        raw: &RawStep,
        ordinal: usize,
        test: &RawTest,
        maps: &TargetMaps,
        diagnostics: &mut Diagnostics,
    ) -> StepIr {
        let target_id = resolve_target(raw, test, maps, diagnostics);

        let url = (raw.name == "navigate")
            .then(|| raw.parameters.get("value").and_then(Value::as_str))
            .flatten()
            .map(str::to_string);
        let selector = target_id
            .as_ref()
            .and_then(|id| maps.selector_of.get(id))
            .cloned();
        let target = (url.is_some() || selector.is_some()).then_some(StepTarget { url, selector });

        let input = raw.parameters.contains_key("value").then(|| InputBinding {
            source: "constant".to_string(),
            field: None,
            masked: is_masked(raw),
        });

        StepIr {
            step_id: step_id(ordinal),
            action: raw.name.clone(),
            target_id,
            target,
            input,
            parameters: raw.parameters.clone(),
        }
    }

    fn build_assertion(
        &self,
        raw: &RawStep,
        ordinal: usize,
        test: &RawTest,
        maps: &TargetMaps,
        diagnostics: &mut Diagnostics,
    ) -> AssertionIr {
        let actual = raw
            .actual
            .as_ref()
            .map(|source| self.build_data_source(source, test, maps, diagnostics))
            .unwrap_or(DataSource {
                source: SourceKind::Constant,
                field: None,
                target_id: None,
                value: Some(Value::Null),
                masked: None,
            });
        let expected = raw
            .expected
            .as_ref()
            .map(|source| self.build_data_source(source, test, maps, diagnostics));

        AssertionIr {
            assert_id: assert_id(ordinal),
            kind: raw.name.clone(),
            actual,
            expected,
        }
    }

    fn build_data_source(
        &self,
        raw: &RawDataSource,
        test: &RawTest,
        maps: &TargetMaps,
        diagnostics: &mut Diagnostics,
    ) -> DataSource {
        let target_id = match raw.kind {
            DataSourceKind::Ui => lookup_target(
                raw.target_node_id.as_deref(),
                raw.target_name_id.as_deref(),
                test,
                maps,
                diagnostics,
            ),
            _ => None,
        };
        DataSource {
            source: SourceKind::from(raw.kind),
            field: raw.field.clone(),
            target_id,
            value: raw.value.clone(),
            masked: None,
        }
    }
}

/// Resolve a step's target: an already-known locator node first, the
/// symbolic name second, null otherwise.
fn resolve_target(
    raw: &RawStep,
    test: &RawTest,
    maps: &TargetMaps,
    diagnostics: &mut Diagnostics,
) -> Option<String> {
    lookup_target(
        raw.target_node_id.as_deref(),
        raw.target_name_id.as_deref(),
        test,
        maps,
        diagnostics,
    )
}

fn lookup_target(
    node_id: Option<&str>,
    name: Option<&str>,
    test: &RawTest,
    maps: &TargetMaps,
    diagnostics: &mut Diagnostics,
) -> Option<String> {
    if let Some(node_id) = node_id {
        if let Some(id) = maps.by_node.get(node_id) {
            return Some(id.clone());
        }
    }
    let name = name?;
    match maps.by_name.get(name) {
        Some(id) => Some(id.clone()),
        None => {
            diagnostics.warn(
                "unresolved_target_name",
                format!("no target named '{name}' in the target repository"),
                test.file_path.clone(),
                None,
            );
            None
        }
    }
}

/// Conservative masking heuristic for input bindings.
fn is_masked(raw: &RawStep) -> bool {
    let name_hits = |s: &str| s.to_ascii_lowercase().contains("password");
    name_hits(&raw.name)
        || raw
            .target_name_id
            .as_deref()
            .is_some_and(name_hits)
}

/// UI role inferred from the conventional field-name suffix.
fn infer_role(name: &str) -> Option<&'static str> {
    if name.ends_with("Button") {
        Some("button")
    } else if name.ends_with("Input") || name.ends_with("Field") {
        Some("textbox")
    } else if name.ends_with("Select") || name.ends_with("Dropdown") {
        Some("combobox")
    } else if name.ends_with("Checkbox") {
        Some("checkbox")
    } else if name.ends_with("Link") {
        Some("link")
    } else if name.ends_with("Label") || name.ends_with("Message") {
        Some("text")
    } else {
        None
    }
}

/// `emailInput` -> `Email Input`.
fn humanize(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if i == 0 {
            out.extend(c.to_uppercase());
        } else if c.is_uppercase() {
            out.push(' ');
            out.push(c);
        } else if c == '_' {
            out.push(' ');
        } else {
            out.push(c);
        }
    }
    out
}
