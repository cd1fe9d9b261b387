//! Per-file extraction orchestrator.
//!
//! For one tree: build the symbol table, harvest targets and page
//! objects, then locate every test method and run each of its statements
//! through the mapper chain. Dispatch is first-match over the held
//! (predicate, mapper) pairs; a mapped invocation's descendants are not
//! revisited, so an assertion's page-object argument does not also emit
//! an action step.
//!
//! Determinism: traversal is pre-order throughout, so step order in the
//! output matches source order.

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use tmc_ast::{AstNode, AstTree, NodeKind};
use tmc_symbol::SymbolTable;

use crate::diag::Diagnostics;
use crate::locators::extract_targets;
use crate::mapper::{ActionMapper, AssertionMapper, StepMapper};
use crate::pages::extract_page_objects;
use crate::record::{FileExtraction, RawStep, RawSuite, RawTest};

/// Extracts raw records from one canonical tree.
pub struct FileExtractor {
    mappers: Vec<Box<dyn StepMapper>>,
    test_name: Regex,
}

impl Default for FileExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FileExtractor {
    /// Extractor with the built-in assertion and action mappers.
    ///
    /// The assertion mapper runs first: assertion members would otherwise
    /// classify as page-object calls through their `Assert` qualifier.
    pub fn new() -> Self {
        Self {
            mappers: vec![Box::new(AssertionMapper), Box::new(ActionMapper)],
            test_name: Regex::new(r"^(test|should|verify)([A-Z0-9_]|$)").unwrap(),
        }
    }

    /// Prepend a user-supplied mapper; it is consulted before the
    /// built-ins.
    pub fn with_mapper(mut self, mapper: Box<dyn StepMapper>) -> Self {
        self.mappers.insert(0, mapper);
        self
    }

    /// Run the full extraction over one tree.
    pub fn extract(&self, tree: &AstTree) -> FileExtraction {
        let table = SymbolTable::build(tree);
        let mut diagnostics = Diagnostics::new();

        let targets = extract_targets(&table, &mut diagnostics);
        let page_objects = extract_page_objects(&table);

        let mut tests = Vec::new();
        let mut suites = Vec::new();

        for class in tree.root.walk().filter(|n| n.kind == NodeKind::ClassDeclaration) {
            let Some(class_name) = class.name.as_deref() else {
                continue;
            };
            let mut suite_tests = Vec::new();
            for method in methods_of(class) {
                if !self.is_test_method(method) {
                    continue;
                }
                let Some(test_name) = method.name.clone() else {
                    continue;
                };
                let test = self.extract_test(
                    method,
                    test_name,
                    class_name,
                    &table,
                    &tree.file_path,
                    &mut diagnostics,
                );
                suite_tests.push(test.name.clone());
                tests.push(test);
            }
            if !suite_tests.is_empty() {
                suites.push(RawSuite {
                    name: class_name.to_string(),
                    description: None,
                    tests: suite_tests,
                });
            }
        }

        debug!(
            file = %tree.file_path,
            targets = targets.len(),
            tests = tests.len(),
            warnings = diagnostics.warning_count(),
            "file extraction complete"
        );

        FileExtraction {
            file_path: tree.file_path.clone(),
            targets,
            page_objects,
            suites,
            tests,
            diagnostics,
        }
    }

    fn extract_test(
        &self,
        method: &AstNode,
        name: String,
        class_name: &str,
        table: &SymbolTable<'_>,
        file_path: &str,
        diagnostics: &mut Diagnostics,
    ) -> RawTest {
        let mut steps = Vec::new();
        for statement in method.walk().skip(1).filter(|n| is_statement_root(n)) {
            self.map_statement(statement, table, file_path, diagnostics, &mut steps);
        }
        RawTest {
            name,
            suite_hint: Some(class_name.to_string()),
            steps,
            tags: method_tags(method),
            file_path: file_path.to_string(),
        }
    }

    /// Dispatch every invocation under one statement, pre-order, to the
    /// first matching mapper. Mapped invocations are not descended into.
    fn map_statement(
        &self,
        statement: &AstNode,
        table: &SymbolTable<'_>,
        file_path: &str,
        diagnostics: &mut Diagnostics,
        steps: &mut Vec<RawStep>,
    ) {
        let mut stack: Vec<&AstNode> = vec![statement];
        while let Some(node) = stack.pop() {
            if node.kind == NodeKind::MethodInvocation {
                match self.mappers.iter().find(|m| m.matches(node)) {
                    Some(mapper) => {
                        if let Some(step) =
                            mapper.map(node, statement, table, file_path, diagnostics)
                        {
                            steps.push(step);
                            continue;
                        }
                    }
                    None => note_unclassified(node, file_path, diagnostics),
                }
            }
            stack.extend(node.children.iter().rev());
        }
    }

    /// A method is a test when annotated `@Test` or when its name follows
    /// the conventional `test*`/`should*`/`verify*` naming.
    fn is_test_method(&self, method: &AstNode) -> bool {
        if let Some(annotations) = method.attrs.get("annotations") {
            if annotation_contains(annotations, "Test") {
                return true;
            }
        }
        method
            .name
            .as_deref()
            .is_some_and(|name| self.test_name.is_match(name))
    }
}

/// Methods of a class, in source order, not descending into nested
/// classes.
fn methods_of(class: &AstNode) -> Vec<&AstNode> {
    let mut methods = Vec::new();
    let mut stack: Vec<&AstNode> = class.children.iter().rev().collect();
    while let Some(node) = stack.pop() {
        match node.kind {
            NodeKind::ClassDeclaration => continue,
            NodeKind::MethodDeclaration => methods.push(node),
            _ => stack.extend(node.children.iter().rev()),
        }
    }
    methods
}

fn is_statement_root(node: &AstNode) -> bool {
    matches!(
        node.kind,
        NodeKind::StatementExpression
            | NodeKind::LocalVariableDeclaration
            | NodeKind::ReturnStatement
    )
}

fn annotation_contains(value: &Value, needle: &str) -> bool {
    match value {
        Value::Array(items) => items
            .iter()
            .any(|item| item.as_str().is_some_and(|s| s.trim_start_matches('@') == needle)),
        Value::String(s) => s.trim_start_matches('@') == needle,
        _ => false,
    }
}

fn method_tags(method: &AstNode) -> Vec<String> {
    match method.attrs.get("tags") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        Some(Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// An unqualified invocation nobody classified is worth a warning; the
/// qualified leftovers are framework noise by construction.
fn note_unclassified(node: &AstNode, file_path: &str, diagnostics: &mut Diagnostics) {
    let Some(member) = node.member() else {
        return;
    };
    if node.qualifier().unwrap_or("").is_empty() {
        diagnostics.warn(
            "unclassified_invocation",
            format!("could not classify call '{}'", member),
            file_path,
            Some(node.id.clone()),
        );
    }
}
