//! End-to-end scenarios: canonical tree -> extraction -> linked IR.

use pretty_assertions::assert_eq;
use serde_json::Value;

use tmc_ast::{AstNode, AstTree, NodeKind};
use tmc_extract::FileExtractor;
use tmc_ir::{IrBuilder, IrBundle, ProjectConfig, SourceKind};

fn node(id: &str, kind: NodeKind) -> AstNode {
    AstNode::new(id, kind).unwrap()
}

/// `By` locator field in the canonical Java shape.
fn by_field(prefix: &str, name: &str, by_member: &str, value: &str) -> AstNode {
    node(prefix, NodeKind::FieldDeclaration)
        .with_attr("type", "By")
        .with_child(
            node(&format!("{prefix}_d"), NodeKind::VariableDeclarator)
                .with_name(name)
                .with_child(
                    node(&format!("{prefix}_by"), NodeKind::MethodInvocation)
                        .with_attr("qualifier", "By")
                        .with_attr("member", by_member)
                        .with_child(
                            node(&format!("{prefix}_lit"), NodeKind::Literal)
                                .with_attr("value", format!("\"{value}\"")),
                        )
                        .unwrap(),
                )
                .unwrap(),
        )
        .unwrap()
}

fn invocation(id: &str, qualifier: &str, member: &str) -> AstNode {
    let inv = node(id, NodeKind::MethodInvocation).with_attr("member", member);
    if qualifier.is_empty() {
        inv
    } else {
        inv.with_attr("qualifier", qualifier)
    }
}

fn stmt(id: &str, inner: AstNode) -> AstNode {
    node(id, NodeKind::StatementExpression).with_child(inner).unwrap()
}

fn member_ref(id: &str, name: &str) -> AstNode {
    node(id, NodeKind::MemberReference).with_attr("member", name)
}

fn test_method(id: &str, name: &str, params: &[&str], statements: Vec<AstNode>) -> AstNode {
    let mut method = node(id, NodeKind::MethodDeclaration)
        .with_name(name)
        .with_attr_value("annotations", serde_json::json!(["Test"]));
    for (i, param) in params.iter().enumerate() {
        method
            .attach(
                node(&format!("{id}_p{i}"), NodeKind::FormalParameter)
                    .with_name(*param)
                    .with_attr("type", "String"),
            )
            .unwrap();
    }
    let mut body = node(&format!("{id}_body"), NodeKind::BlockStatement);
    for s in statements {
        body.attach(s).unwrap();
    }
    method.attach(body).unwrap();
    method
}

fn class(id: &str, name: &str, members: Vec<AstNode>) -> AstNode {
    let mut class = node(id, NodeKind::ClassDeclaration).with_name(name);
    for m in members {
        class.attach(m).unwrap();
    }
    class
}

fn tree(file: &str, classes: Vec<AstNode>) -> AstTree {
    let mut root = node("root", NodeKind::CompilationUnit);
    for c in classes {
        root.attach(c).unwrap();
    }
    AstTree::new(root, "java", file).unwrap()
}

fn build(trees: &[AstTree]) -> IrBundle {
    let mut config = ProjectConfig::new("shop", "selenium-java", "playwright");
    config.created_on = Some("2026-01-01T00:00:00Z".to_string());
    let extractor = FileExtractor::new();
    let extractions = trees.iter().map(|t| extractor.extract(t)).collect();
    IrBuilder::new(&config).build(extractions).unwrap()
}

/// Direct Selenium in a test: `driver.findElement(loginButton).click()`.
#[test]
fn scenario_direct_selenium_click() {
    let login_page = class(
        "c1",
        "LoginPage",
        vec![
            by_field("f1", "username", "cssSelector", "#username"),
            by_field("f2", "password", "cssSelector", "#password"),
            by_field("f3", "loginButton", "cssSelector", "#login-btn"),
        ],
    );
    let login_test = class(
        "c2",
        "LoginFlowTest",
        vec![test_method(
            "m1",
            "testLogin",
            &[],
            vec![stmt(
                "s1",
                invocation("i1", "", "click")
                    .with_child(
                        invocation("i2", "driver", "findElement")
                            .with_child(member_ref("r1", "loginButton"))
                            .unwrap(),
                    )
                    .unwrap(),
            )],
        )],
    );

    let bundle = build(&[tree("LoginPage.java", vec![login_page, login_test])]);

    assert_eq!(bundle.targets.len(), 3);
    assert!(bundle.diagnostics.is_empty());

    let login_button = bundle
        .targets
        .iter()
        .find(|t| t.selector_strategies[0].value == "#login-btn")
        .expect("loginButton target");

    let test = &bundle.tests[0];
    assert_eq!(test.steps.len(), 1);
    assert_eq!(test.steps[0].action, "click");
    assert_eq!(
        test.steps[0].target_id.as_deref(),
        Some(login_button.target_id.as_str())
    );
}

/// Page-object call from a test: `loginPage.enterEmail("john@test.com")`.
#[test]
fn scenario_page_object_call() {
    let login_page = class(
        "c1",
        "LoginPage",
        vec![
            by_field("f1", "emailInput", "cssSelector", "#email"),
            {
                // enterEmail(String s) { driver.findElement(emailInput).sendKeys(s); }
                let body = node("m0_body", NodeKind::BlockStatement)
                    .with_child(stmt(
                        "m0_s1",
                        invocation("m0_i1", "", "sendKeys")
                            .with_child(
                                invocation("m0_i2", "driver", "findElement")
                                    .with_child(member_ref("m0_r1", "emailInput"))
                                    .unwrap(),
                            )
                            .unwrap(),
                    ))
                    .unwrap();
                node("m0", NodeKind::MethodDeclaration)
                    .with_name("enterEmail")
                    .with_child(
                        node("m0_p0", NodeKind::FormalParameter)
                            .with_name("s")
                            .with_attr("type", "String"),
                    )
                    .unwrap()
                    .with_child(body)
                    .unwrap()
            },
        ],
    );
    let login_test = class(
        "c2",
        "LoginFlowTest",
        vec![test_method(
            "m1",
            "testEmail",
            &[],
            vec![stmt(
                "s1",
                invocation("i1", "loginPage", "enterEmail")
                    .with_child(
                        node("a1", NodeKind::Literal).with_attr("value", "\"john@test.com\""),
                    )
                    .unwrap(),
            )],
        )],
    );

    let bundle = build(&[tree("LoginPage.java", vec![login_page, login_test])]);

    let email_input = bundle
        .targets
        .iter()
        .find(|t| t.selector_strategies[0].value == "#email")
        .expect("emailInput target");

    let test = &bundle.tests[0];
    assert_eq!(test.steps.len(), 1);
    let step = &test.steps[0];
    assert_eq!(step.action, "enterEmail");
    assert_eq!(step.target_id.as_deref(), Some(email_input.target_id.as_str()));
    assert_eq!(
        step.parameters.get("value"),
        Some(&Value::String("john@test.com".to_string()))
    );
}

/// Method-name inference when the body is elided:
/// `loginPage.clickRegisterLink()` binds to the `registerLinkButton` field.
#[test]
fn scenario_name_inference_only() {
    let login_page = class(
        "c1",
        "LoginPage",
        vec![
            by_field("f1", "registerLinkButton", "id", "register"),
            node("m0", NodeKind::MethodDeclaration).with_name("clickRegisterLink"),
        ],
    );
    let login_test = class(
        "c2",
        "RegisterTest",
        vec![test_method(
            "m1",
            "testRegisterLink",
            &[],
            vec![stmt("s1", invocation("i1", "loginPage", "clickRegisterLink"))],
        )],
    );

    let bundle = build(&[tree("LoginPage.java", vec![login_page, login_test])]);

    let register = bundle
        .targets
        .iter()
        .find(|t| t.selector_strategies[0].value == "register")
        .expect("registerLinkButton target");

    let step = &bundle.tests[0].steps[0];
    assert_eq!(step.action, "clickRegisterLink");
    assert_eq!(step.target_id.as_deref(), Some(register.target_id.as_str()));
}

/// Framework utilities are skipped: a `wait.until(...)` statement emits
/// nothing, the following click still does.
#[test]
fn scenario_framework_utility_skipped() {
    let login_page = class(
        "c1",
        "LoginPage",
        vec![by_field("f1", "emailInput", "cssSelector", "#email")],
    );
    let login_test = class(
        "c2",
        "WaitTest",
        vec![test_method(
            "m1",
            "testWaitThenClick",
            &[],
            vec![
                stmt(
                    "s1",
                    invocation("i1", "wait", "until")
                        .with_child(
                            invocation("i2", "ExpectedConditions", "visibilityOfElementLocated")
                                .with_child(member_ref("r1", "emailInput"))
                                .unwrap(),
                        )
                        .unwrap(),
                ),
                stmt(
                    "s2",
                    invocation("i3", "", "click")
                        .with_child(
                            invocation("i4", "driver", "findElement")
                                .with_child(member_ref("r2", "emailInput"))
                                .unwrap(),
                        )
                        .unwrap(),
                ),
            ],
        )],
    );

    let bundle = build(&[tree("WaitTest.java", vec![login_page, login_test])]);

    let test = &bundle.tests[0];
    assert_eq!(test.steps.len(), 1);
    assert_eq!(test.steps[0].action, "click");
    assert!(test.steps[0].target_id.is_some());
}

/// An unresolvable page-object call still emits a step, with a warning.
#[test]
fn scenario_unresolvable_page_object_call() {
    let misc_test = class(
        "c1",
        "MiscTest",
        vec![test_method(
            "m1",
            "testMagic",
            &[],
            vec![stmt("s1", invocation("i1", "helperLib", "doMagic"))],
        )],
    );

    let bundle = build(&[tree("MiscTest.java", vec![misc_test])]);

    let test = &bundle.tests[0];
    assert_eq!(test.steps.len(), 1);
    assert_eq!(test.steps[0].action, "doMagic");
    assert_eq!(test.steps[0].target_id, None);
    assert_eq!(bundle.diagnostics.warning_count(), 1);
    assert_eq!(
        bundle.diagnostics.iter().next().unwrap().code,
        "unresolved_page_object"
    );
}

/// Assertion mixing a UI read and a data-bound parameter:
/// `Assert.assertEquals(homePage.getWelcomeMessage(), expectedMessage)`.
#[test]
fn scenario_assertion_ui_vs_data() {
    let home_page = class(
        "c1",
        "HomePage",
        vec![
            by_field("f1", "welcomeMessage", "cssSelector", ".welcome"),
            {
                let body = node("m0_body", NodeKind::BlockStatement)
                    .with_child(
                        node("m0_ret", NodeKind::ReturnStatement)
                            .with_child(
                                invocation("m0_i1", "", "getText")
                                    .with_child(
                                        invocation("m0_i2", "driver", "findElement")
                                            .with_child(member_ref("m0_r1", "welcomeMessage"))
                                            .unwrap(),
                                    )
                                    .unwrap(),
                            )
                            .unwrap(),
                    )
                    .unwrap();
                node("m0", NodeKind::MethodDeclaration)
                    .with_name("getWelcomeMessage")
                    .with_child(body)
                    .unwrap()
            },
        ],
    );
    let home_test = class(
        "c2",
        "HomeTest",
        vec![test_method(
            "m1",
            "testWelcome",
            &["expectedMessage"],
            vec![stmt(
                "s1",
                invocation("i1", "Assert", "assertEquals")
                    .with_child(invocation("i2", "homePage", "getWelcomeMessage"))
                    .unwrap()
                    .with_child(member_ref("a2", "expectedMessage"))
                    .unwrap(),
            )],
        )],
    );

    let bundle = build(&[tree("HomeTest.java", vec![home_page, home_test])]);

    let welcome = bundle
        .targets
        .iter()
        .find(|t| t.selector_strategies[0].value == ".welcome")
        .expect("welcomeMessage target");

    let test = &bundle.tests[0];
    assert!(test.steps.is_empty());
    assert_eq!(test.assertions.len(), 1);
    let assertion = &test.assertions[0];
    assert_eq!(assertion.kind, "assertEquals");
    assert_eq!(assertion.actual.source, SourceKind::Ui);
    assert_eq!(
        assertion.actual.target_id.as_deref(),
        Some(welcome.target_id.as_str())
    );
    let expected = assertion.expected.as_ref().expect("expected operand");
    assert_eq!(expected.source, SourceKind::Data);
    assert_eq!(expected.field.as_deref(), Some("expectedMessage"));
}
