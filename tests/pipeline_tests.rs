//! End-to-end tests driving the whole front end from source text.

use hanami::diagnostics::DiagnosticReporter;
use hanami::lexer::Scanner;
use hanami::parser::{Parser, Program};
use hanami::semantic::SemanticAnalyzer;
use hanami::Driver;

fn driver_for(source: &str) -> Driver {
    Driver::new("test.hnm".to_string(), source.to_string())
}

fn parse(source: &str) -> Program {
    let mut reporter = DiagnosticReporter::new("test.hnm", source);
    let tokens = Scanner::new(source, &mut reporter).scan_tokens();
    assert!(!reporter.has_errors());
    Parser::new(tokens).parse().expect("parse failed")
}

#[test]
fn a_complete_program_passes_the_pipeline() {
    let source = r#"
        style <iostream>

        garden Meadow;

        species Rose {
        open:
            int petals;
            grow describe() -> int {
                bloom << "petals: " << petals;
                blossom petals;
            }
        hidden:
            string secret_name;
        }

        grow main() -> int {
            Rose r;
            r.petals = 5;

            branch (r.petals > 3) {
                bloom << "blooming";
            } else {
                bloom << "budding";
            }

            int total = 0;
            for (int i = 0; i < 10; i = i + 1) {
                total = total + i;
            }

            while (total > 100) {
                total = total - 10;
            }

            water >> total;
            blossom r.describe();
        }
    "#;

    let program = driver_for(source).run().expect("pipeline failed");
    assert!(!program.statements.is_empty());
}

#[test]
fn syntax_errors_are_fatal_and_produce_no_ast() {
    // missing ';' after the variable declaration
    let result = driver_for("grow main() -> int { int x = 1 blossom x; }").run();

    let diagnostics = result.expect_err("expected a syntax error");
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].is_error());
    assert!(diagnostics[0]
        .message
        .contains("Expect ';' after variable declaration."));

    let location = diagnostics[0].location.as_ref().expect("missing location");
    assert_eq!(location.line, 1);
}

#[test]
fn semantic_failures_arrive_as_a_batch() {
    let source = r#"
        grow main() -> int {
            int x = missing_one;
            int y = missing_two;
            blossom "not an int";
        }
    "#;

    let diagnostics = driver_for(source).run().expect_err("expected failure");
    assert_eq!(diagnostics.len(), 3);
    assert!(diagnostics.iter().all(|d| d.is_error()));
}

#[test]
fn lexer_errors_stop_the_pipeline_before_parsing() {
    let diagnostics = driver_for("int x = `1;").run().expect_err("expected failure");
    assert!(diagnostics[0].message.contains("unexpected character"));
}

#[test]
fn validated_ast_round_trips_through_the_interchange_form() {
    let source = r#"
        species Rose {
        open:
            int petals;
            grow count() -> int { blossom petals; }
        }
        grow main() -> int {
            Rose r;
            blossom r.count();
        }
    "#;

    let program = driver_for(source).run().expect("pipeline failed");
    let json = serde_json::to_string(&program).expect("serialize failed");

    // the analyzer accepts a deserialized tree at the pipeline boundary
    let reparsed = Driver::new("test.json".to_string(), json)
        .run_from_ast()
        .expect("analysis of deserialized AST failed");
    assert_eq!(program, reparsed);
}

#[test]
fn interchange_form_uses_tagged_records_and_keyword_strings() {
    let program = parse("species Rose { hidden: int thorns; }\nbloom << 1 + 2;");
    let json = serde_json::to_value(&program).expect("serialize failed");

    assert_eq!(json["node_type"], "Program");

    let species = &json["statements"][0];
    assert_eq!(species["node_type"], "RecordDecl");
    assert_eq!(species["sections"][0]["node_type"], "VisibilityBlock");
    assert_eq!(species["sections"][0]["visibility"], "hidden");

    let io = &json["statements"][1];
    assert_eq!(io["node_type"], "Io");
    assert_eq!(io["channel"], "bloom");
    assert_eq!(io["direction"], "<<");
    assert_eq!(io["expressions"][0]["operator"], "+");
}

#[test]
fn malformed_interchange_input_is_reported_not_panicked() {
    let diagnostics = Driver::new("bad.json".to_string(), "{\"node_type\": 42}".to_string())
        .run_from_ast()
        .expect_err("expected failure");
    assert!(diagnostics[0].message.contains("could not deserialize AST"));
}

#[test]
fn reanalyzing_the_same_tree_is_idempotent() {
    let program = parse(
        r#"
        grow main() -> int {
            int x = missing;
            blossom x;
        }
        "#,
    );

    let first = SemanticAnalyzer::new().analyze(&program);
    let second = SemanticAnalyzer::new().analyze(&program);

    assert!(!first.ok());
    assert_eq!(first, second);
}

#[test]
fn visibility_is_enforced_across_species() {
    let source = r#"
        species Rose {
        hidden:
            string secret;
        }
        species Gardener {
        open:
            grow peek() -> string {
                Rose r;
                blossom r.secret;
            }
        }
    "#;

    let diagnostics = driver_for(source).run().expect_err("expected failure");
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0]
        .message
        .contains("Cannot find accessible member variable 'secret' in species 'Rose'"));
}

#[test]
fn methods_may_call_their_own_hidden_siblings() {
    let source = r#"
        species Rose {
        open:
            grow describe() -> int { blossom measure(); }
        hidden:
            grow measure() -> int { blossom 4; }
        }
    "#;

    driver_for(source).run().expect("pipeline failed");
}
