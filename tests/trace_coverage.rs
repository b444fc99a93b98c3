//! Property-based tests for the recognition trace.
//!
//! Whatever the content of a document, every one of its lines must be traced
//! exactly once and nothing outside documents may be traced.

use kube_tadm::AnalysisError;
use kube_tadm::analyzer::parse_manifest;
use proptest::prelude::*;

fn name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,12}"
}

// Lines the walkers have to step over without losing track of indentation
fn noise() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("# comment".to_string()),
        Just("    # indented comment".to_string()),
        Just("  annotations:".to_string()),
        Just("    team: shop".to_string()),
        Just("      - weird".to_string()),
        Just("-".to_string()),
        Just("  extra: \"value: with colon\"".to_string()),
    ]
}

fn service(name: String, port: u16, target: u16) -> Vec<String> {
    vec![
        "kind: Service".to_string(),
        "metadata:".to_string(),
        format!("  name: {name}"),
        "spec:".to_string(),
        "  selector:".to_string(),
        format!("    app: {name}"),
        "  ports:".to_string(),
        format!("  - port: {port}"),
        format!("    targetPort: {target}"),
    ]
}

fn deployment(name: String, port: u16, replicas: u8) -> Vec<String> {
    vec![
        "kind: Deployment".to_string(),
        "metadata:".to_string(),
        format!("  name: {name}"),
        "spec:".to_string(),
        format!("  replicas: {replicas}"),
        "  template:".to_string(),
        "    spec:".to_string(),
        "      containers:".to_string(),
        format!("        - name: {name}"),
        format!("          image: {name}:latest"),
        "          ports:".to_string(),
        format!("            - containerPort: {port}"),
        "          env:".to_string(),
        "            - name: DB_HOST".to_string(),
        format!("              value: {name}-db"),
    ]
}

fn unknown(name: String) -> Vec<String> {
    vec![
        "kind: ConfigMap".to_string(),
        "metadata:".to_string(),
        format!("  name: {name}"),
        "data:".to_string(),
        "  key: value".to_string(),
    ]
}

/// A document: its lines with noise spliced in after the `kind:` line.
fn document() -> impl Strategy<Value = Vec<String>> {
    let base = prop_oneof![
        (name(), any::<u16>(), any::<u16>()).prop_map(|(n, p, t)| service(n, p, t)),
        (name(), any::<u16>(), any::<u8>()).prop_map(|(n, p, r)| deployment(n, p, r)),
        name().prop_map(unknown),
    ];
    (base, prop::collection::vec((1..20usize, noise()), 0..6)).prop_map(|(mut lines, inserts)| {
        for (at, line) in inserts {
            let at = at.min(lines.len());
            lines.insert(at, line);
        }
        lines
    })
}

/// A file of documents, each optionally preceded by an untraced preamble
/// line. Returns the file and the expected traced line numbers.
fn manifest() -> impl Strategy<Value = (String, Vec<u32>)> {
    prop::collection::vec((any::<bool>(), document()), 1..5).prop_map(|documents| {
        let mut lines: Vec<String> = Vec::new();
        let mut expected = Vec::new();
        for (i, (preamble, document)) in documents.into_iter().enumerate() {
            if i > 0 {
                lines.push("---".to_string());
            }
            if preamble {
                lines.push("apiVersion: v1".to_string());
            }
            for line in document {
                lines.push(line);
                expected.push(lines.len() as u32);
            }
        }
        (lines.join("\n"), expected)
    })
}

proptest! {
    /// Property: document lines are traced exactly once, other lines never
    #[test]
    fn prop_every_document_line_is_traced_once((content, expected) in manifest()) {
        let parsed = parse_manifest(&content).unwrap();
        let mut numbers: Vec<u32> = parsed.trace.lines().iter().map(|l| l.number).collect();
        numbers.sort_unstable();
        prop_assert_eq!(numbers, expected);
        prop_assert!(parsed.trace.lines().iter().all(|l| l.recognized && l.weight <= 1));
    }

    /// Property: the kind line of a recognized document is always understood
    #[test]
    fn prop_document_ranges_match_trace((content, _) in manifest()) {
        let parsed = parse_manifest(&content).unwrap();
        for document in &parsed.documents {
            let range = document.line_numbers();
            let traced = parsed
                .trace
                .lines()
                .iter()
                .filter(|l| range.contains(&l.number))
                .count();
            prop_assert_eq!(traced, document.line_count as usize);
        }
    }

    /// Property: arbitrary text never panics; the only failure is a bad number
    #[test]
    fn prop_parser_never_panics(lines in prop::collection::vec("[ -~]{0,30}", 0..40)) {
        match parse_manifest(&lines.join("\n")) {
            Ok(_) | Err(AnalysisError::InvalidNumber { .. }) => {}
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }
}

#[test]
fn test_coverage_counts_weighted_lines() {
    let content = "kind: Service\nmetadata:\n  name: web\n  annotations:\n    team: shop\n";
    let coverage = parse_manifest(content).unwrap().trace.coverage();
    assert_eq!(coverage.total_lines, 5);
    assert_eq!(coverage.weighted_lines, 3);
    assert!((coverage.percent() - 60.0).abs() < f64::EPSILON);
}
