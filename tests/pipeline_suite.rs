use std::path::Path;

use docviz::{extract, render_document, DiagramContent, ExtractOptions, NotationKind, Warning};
use pretty_assertions::assert_eq;

fn fixture(rel: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(rel);
    std::fs::read_to_string(&path).unwrap_or_else(|err| panic!("fixture {rel}: {err}"))
}

fn assert_valid_svg(svg: &str, fixture: &str) {
    assert!(svg.starts_with("<svg"), "{fixture}: missing <svg tag");
    assert!(svg.ends_with("</svg>"), "{fixture}: missing </svg tag");
}

#[test]
fn render_all_fixtures() {
    // Keep this list explicit so new notations must be added intentionally.
    let candidates = [
        ("flowchart/fenced.md", NotationKind::Flowchart),
        ("sequence/heuristic.txt", NotationKind::Sequence),
        ("textflow/steps.txt", NotationKind::TextFlow),
        ("orgchart/basic.txt", NotationKind::OrgChart),
        ("timeline/dated.txt", NotationKind::Timeline),
        ("gantt/table.md", NotationKind::Gantt),
        ("gantt/descriptive.txt", NotationKind::Gantt),
    ];

    for (rel, expected) in candidates {
        let rendered = render_document(&fixture(rel), &ExtractOptions::default())
            .unwrap_or_else(|err| panic!("{rel}: {err}"));
        assert_eq!(rendered.len(), 1, "{rel}: expected exactly one diagram");
        assert_eq!(rendered[0].kind, expected, "{rel}: wrong notation");
        assert_valid_svg(&rendered[0].artifact.svg, rel);
    }
}

#[test]
fn mixed_report_extracts_in_document_order() {
    let extraction = extract(&fixture("mixed/report.md"), &ExtractOptions::default()).unwrap();
    let kinds: Vec<NotationKind> = extraction.diagrams.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NotationKind::Flowchart,
            NotationKind::Gantt,
            NotationKind::Timeline
        ]
    );
    let DiagramContent::Timeline(events) = &extraction.diagrams[2].content else {
        panic!("expected timeline");
    };
    assert_eq!(events.len(), 3);
    assert!(events[2].milestone);
}

#[test]
fn unterminated_fence_does_not_hide_later_diagrams() {
    let extraction = extract(&fixture("malformed/unterminated.md"), &ExtractOptions::default())
        .unwrap();
    assert_eq!(extraction.diagrams.len(), 1);
    assert_eq!(extraction.diagrams[0].kind, NotationKind::Timeline);
}

#[test]
fn plain_prose_renders_nothing() {
    let rendered =
        render_document(&fixture("plain/prose.txt"), &ExtractOptions::default()).unwrap();
    assert!(rendered.is_empty());
}

#[test]
fn descriptive_gantt_resolves_dependencies() {
    let extraction =
        extract(&fixture("gantt/descriptive.txt"), &ExtractOptions::default()).unwrap();
    let DiagramContent::Gantt(tasks) = &extraction.diagrams[0].content else {
        panic!("expected gantt");
    };
    assert_eq!(tasks.len(), 3);
    assert_eq!(tasks[1].dependencies, vec!["design".to_string()]);
    assert_eq!(tasks[2].dependencies, vec!["build".to_string()]);
    assert!(extraction.diagrams[0].warnings.is_empty());
}

#[test]
fn duplicate_task_names_are_renamed_and_rendered() {
    let text = "\
| Task | Start | End |\n\
|------|-------|-----|\n\
| Design | 2024-01-01 | 2024-01-10 |\n\
| Design | 2024-01-11 | 2024-01-20 |\n";
    let rendered = render_document(text, &ExtractOptions::default()).unwrap();
    assert_eq!(rendered.len(), 1);
    assert!(rendered[0]
        .warnings
        .iter()
        .any(|w| matches!(w, Warning::DuplicateId { .. })));
    let svg = &rendered[0].artifact.svg;
    assert!(svg.contains("data-entity-id=\"design\""));
    assert!(svg.contains("data-entity-id=\"design-2\""));
}

#[test]
fn dangling_dependency_is_dropped_with_warning() {
    let text = "Build from 2024-02-01 to 2024-03-01, after Ghost\n";
    let extraction = extract(text, &ExtractOptions::default()).unwrap();
    assert_eq!(extraction.diagrams.len(), 1);
    let DiagramContent::Gantt(tasks) = &extraction.diagrams[0].content else {
        panic!("expected gantt");
    };
    assert!(tasks[0].dependencies.is_empty());
    assert!(extraction.diagrams[0]
        .warnings
        .iter()
        .any(|w| matches!(w, Warning::DanglingDependency { .. })));
}

#[test]
fn whole_pipeline_is_bit_for_bit_deterministic() {
    let text = fixture("mixed/report.md");
    let options = ExtractOptions::default();
    let first: Vec<String> = render_document(&text, &options)
        .unwrap()
        .into_iter()
        .map(|d| d.artifact.svg)
        .collect();
    let second: Vec<String> = render_document(&text, &options)
        .unwrap()
        .into_iter()
        .map(|d| d.artifact.svg)
        .collect();
    assert_eq!(first, second);
}
