//! End-to-end CLI pipeline test: config + serialized trees in, IR files out.

use std::fs;

use tmc_ast::{AstNode, AstTree, NodeKind};
use tmc_cli::{run_main, TmcOptions};

fn login_tree() -> AstTree {
    let field = AstNode::new("f1", NodeKind::Field)
        .unwrap()
        .with_name("loginButton")
        .with_child(
            AstNode::new("f1_by", NodeKind::MethodInvocation)
                .unwrap()
                .with_attr("qualifier", "By")
                .with_attr("member", "cssSelector")
                .with_child(
                    AstNode::new("f1_lit", NodeKind::Literal)
                        .unwrap()
                        .with_attr("value", "\"#login-btn\""),
                )
                .unwrap(),
        )
        .unwrap();
    let method = AstNode::new("m1", NodeKind::MethodDeclaration)
        .unwrap()
        .with_name("testLogin")
        .with_attr_value("annotations", serde_json::json!(["Test"]))
        .with_child(
            AstNode::new("m1_body", NodeKind::BlockStatement)
                .unwrap()
                .with_child(
                    AstNode::new("s1", NodeKind::StatementExpression)
                        .unwrap()
                        .with_child(
                            AstNode::new("i1", NodeKind::MethodInvocation)
                                .unwrap()
                                .with_attr("member", "click")
                                .with_child(
                                    AstNode::new("r1", NodeKind::MemberReference)
                                        .unwrap()
                                        .with_attr("member", "loginButton"),
                                )
                                .unwrap(),
                        )
                        .unwrap(),
                )
                .unwrap(),
        )
        .unwrap();
    let class = AstNode::new("c1", NodeKind::ClassDeclaration)
        .unwrap()
        .with_name("LoginTest")
        .with_child(field)
        .unwrap()
        .with_child(method)
        .unwrap();
    let root = AstNode::new("root", NodeKind::CompilationUnit)
        .unwrap()
        .with_child(class)
        .unwrap();
    AstTree::new(root, "java", "LoginTest.java").unwrap()
}

#[test]
fn processes_a_project_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let ast_path = dir.path().join("LoginTest.ast.json");
    fs::write(&ast_path, login_tree().to_json().unwrap()).unwrap();

    let config_path = dir.path().join("tmc.json");
    fs::write(
        &config_path,
        serde_json::json!({
            "projectName": "shop",
            "sourceFramework": "selenium-java",
            "targetFramework": "playwright",
            "createdOn": "2026-01-01T00:00:00Z"
        })
        .to_string(),
    )
    .unwrap();

    let out = dir.path().join("ir-out");
    let opts = TmcOptions {
        config: config_path,
        files: Vec::new(),
        dirs: vec![dir.path().display().to_string()],
        out: out.clone(),
        emit_ir: false,
    };

    let bundle = run_main(&opts).unwrap().expect("bundle");
    assert_eq!(bundle.tests.len(), 1);
    assert_eq!(bundle.targets.len(), 1);
    assert_eq!(bundle.tests[0].steps[0].action, "click");
    assert!(bundle.tests[0].steps[0].target_id.is_some());

    assert!(out.join("project.json").is_file());
    assert!(out.join("environment.json").is_file());
    assert!(out.join("targets.json").is_file());
    assert!(out.join("suites/SUITE_LoginTest.json").is_file());
    assert!(out.join("tests/TEST_LoginTest_testLogin.json").is_file());

    let targets = fs::read_to_string(out.join("targets.json")).unwrap();
    assert!(targets.ends_with('\n'));
    assert!(targets.contains("\"targetId\""));
}

#[test]
fn empty_input_set_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("tmc.json");
    fs::write(
        &config_path,
        serde_json::json!({
            "projectName": "shop",
            "sourceFramework": "selenium-java",
            "targetFramework": "playwright"
        })
        .to_string(),
    )
    .unwrap();

    let opts = TmcOptions {
        config: config_path,
        files: Vec::new(),
        dirs: vec![dir.path().display().to_string()],
        out: dir.path().join("ir-out"),
        emit_ir: false,
    };

    assert!(run_main(&opts).unwrap().is_none());
}
