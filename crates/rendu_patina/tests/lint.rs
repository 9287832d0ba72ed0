//! Linting in-memory projects end to end.

use rendu_croquis::Project;
use rendu_patina::{format_results, format_summary, lint_project, Linter, OutputFormat};
use rendu_relief::RenderTypesOptions;

const APP: &str = "function Header() { return <h1 />; }
function Footer() { return <footer />; }
/** @renders Header */
function Loose() { return <Footer />; }
/** @renders {Header} */
function Strict() { return <Footer />; }
";

fn project(files: &[(&str, &str)]) -> Project {
    let mut project = Project::new(RenderTypesOptions::default());
    for (path, source) in files {
        project.add_source(path, source).unwrap();
    }
    project
}

fn sources(files: &[(&str, &str)]) -> Vec<(String, String)> {
    files
        .iter()
        .map(|(path, source)| (path.to_string(), source.to_string()))
        .collect()
}

#[test]
fn compact_output() {
    let files = [("src/App.tsx", APP)];
    let (results, summary) = lint_project(&project(&files));

    let output = format_results(&results, &sources(&files), OutputFormat::Compact);
    insta::assert_snapshot!(output, @r"
    src/App.tsx:3:5  warning  @renders target must be wrapped in braces  [render-types/valid-renders-jsdoc]
        help: Did you mean `@renders {Header}`?
    src/App.tsx:6:28  error  Expected to render <Header>, but found <Footer>  [render-types/valid-render-return]
        help: <Footer> has no `@renders` declaration; annotate it with `@renders {Header}` if it always renders Header
    ");
    insta::assert_snapshot!(
        format_summary(summary.error_count, summary.warning_count, summary.file_count),
        @"1 error, 1 warning in 1 file"
    );
}

#[test]
fn json_output() {
    let files = [("src/App.tsx", APP)];
    let (results, _) = lint_project(&project(&files));

    let output = format_results(&results, &sources(&files), OutputFormat::Json);
    insta::assert_snapshot!(output, @r#"
    [
      {
        "file": "src/App.tsx",
        "messages": [
          {
            "ruleId": "render-types/valid-renders-jsdoc",
            "severity": 1,
            "message": "@renders target must be wrapped in braces",
            "line": 3,
            "column": 5,
            "endLine": 3,
            "endColumn": 20,
            "fix": {
              "message": "Replace with `@renders {Header}`",
              "edits": [
                {
                  "start": 82,
                  "end": 97,
                  "newText": "@renders {Header}"
                }
              ]
            }
          },
          {
            "ruleId": "render-types/valid-render-return",
            "severity": 2,
            "message": "Expected to render <Header>, but found <Footer>",
            "line": 6,
            "column": 28,
            "endLine": 6,
            "endColumn": 38
          }
        ],
        "errorCount": 1,
        "warningCount": 1
      }
    ]
    "#);
}

#[test]
fn rich_output_mentions_rule_findings() {
    let files = [("src/App.tsx", APP)];
    let (results, _) = lint_project(&project(&files));

    let output = format_results(&results, &sources(&files), OutputFormat::Text);
    assert!(output.contains("but found <Footer>"));
    assert!(output.contains("Did you mean"));
}

#[test]
fn applying_the_fix_enables_checking() {
    let files = [("src/App.tsx", APP)];
    let (results, _) = lint_project(&project(&files));
    let fix = results[0]
        .diagnostics
        .iter()
        .find_map(|d| d.fix.as_ref())
        .unwrap();
    let fixed = fix.apply(APP);
    assert!(fixed.contains("/** @renders {Header} */\nfunction Loose()"));

    // Loose is now annotated, and its return is checked too
    let (results, summary) = lint_project(&project(&[("src/App.tsx", fixed.as_str())]));
    assert_eq!(summary.warning_count, 0);
    assert_eq!(summary.error_count, 2);
    assert!(results[0]
        .diagnostics
        .iter()
        .all(|d| d.rule_name == "render-types/valid-render-return"));
}

#[test]
fn prop_contracts_across_files() {
    let files = [
        (
            "src/Menu.tsx",
            r#"export interface MenuProps {
  /** @renders* {MenuItem} */
  children?: unknown;
}

export function MenuItem() { return <li />; }

export function Menu(props: MenuProps) { return <ul />; }
"#,
        ),
        (
            "src/App.tsx",
            r#"import { Menu, MenuItem } from "./Menu";

export const Good = () => <Menu><MenuItem /><MenuItem /></Menu>;
export const Bad = () => <Menu><MenuItem /><hr /></Menu>;
"#,
        ),
    ];
    let project = project(&files);
    let (results, summary) = Linter::new().lint_project(&project);

    assert_eq!(summary.file_count, 2);
    assert_eq!(summary.error_count, 1);
    let app = results.iter().find(|r| r.filename == "src/App.tsx").unwrap();
    insta::assert_snapshot!(
        app.diagnostics[0].message.as_str(),
        @"Invalid `children` for <Menu>: Expected to render <MenuItem>, but found <hr>"
    );
}
