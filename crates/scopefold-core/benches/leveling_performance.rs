//! Leveling Performance Baseline Benchmarks
//!
//! Baselines:
//! - Selector matching: literal fast path vs. general evaluator
//! - Leveling a 2,000-line document: <20ms

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use scopefold_core::{Classifiers, CompileMode, LevelingEngine, PatternLexer, Rules};
use scopefold_selector::Selector;
use std::time::Duration;

const RULES: &str = r#"
dedentation = ["keyword.control.else", "keyword.control.elseif"]

[assignment]
multiple = "meta.assignment.variable.group"
separator = "punctuation.separator.comma"

[punctuation]
continuation = "punctuation.separator.continuation"

[indentation]
"keyword.control.end" = -1
"keyword.control.else" = -1
"keyword.control" = 1
"storage.type.function" = 1
"#;

const PATTERNS: &str = r#"
scope_name = "source.m"

[[rule]]
pattern = "\\bfunction\\b"
scopes = ["meta.function.m", "storage.type.function.m"]

[[rule]]
pattern = "\\bend\\b"
scopes = ["keyword.control.end.m"]

[[rule]]
pattern = "\\belse\\b"
scopes = ["keyword.control.else.m"]

[[rule]]
pattern = "\\b(if|for|while)\\b"
scopes = ["keyword.control.m"]

[[rule]]
pattern = "\\.\\.\\."
scopes = ["punctuation.separator.continuation.m"]

[[rule]]
pattern = "[A-Za-z_][A-Za-z0-9_]*"
scopes = ["variable.other.m"]
"#;

/// Generate a MATLAB-like document with the given number of functions
fn generate_document(functions: usize) -> String {
    let mut content = String::new();
    for i in 0..functions {
        content.push_str(&format!("function out{i} = compute{i}(a, ...\n    b)\n"));
        content.push_str("  if a\n    out = a + b;\n  else\n    out = a - b;\n  end\n");
        content.push_str("  for k = 1:10\n    out = out + k;\n  end\nend\n\n");
    }
    content
}

fn bench_selector_matching(c: &mut Criterion) {
    let scopes = [
        "source.m",
        "meta.function.m",
        "meta.parameters.m",
        "variable.parameter.input.m",
    ];
    let literal = Selector::new("variable.parameter").unwrap();
    let path = Selector::new("meta.function variable.parameter").unwrap();
    let composite = Selector::new("(meta.function | meta.class) & -comment variable").unwrap();

    let mut group = c.benchmark_group("selector_matching");
    group.bench_function("literal", |b| b.iter(|| literal.matches(black_box(&scopes))));
    group.bench_function("path", |b| b.iter(|| path.matches(black_box(&scopes))));
    group.bench_function("composite", |b| {
        b.iter(|| composite.matches(black_box(&scopes)))
    });
    group.finish();
}

fn bench_leveling(c: &mut Criterion) {
    let rules = Rules::from_toml_str(RULES).unwrap();
    let classifiers = Classifiers::compile(&rules, CompileMode::Strict).unwrap();
    let lexer = PatternLexer::from_toml_str(PATTERNS).unwrap();
    let engine = LevelingEngine::new(&classifiers, &lexer);

    let mut group = c.benchmark_group("leveling");
    group.measurement_time(Duration::from_secs(5));

    for functions in [10, 50, 150] {
        let document = generate_document(functions);
        group.bench_with_input(
            BenchmarkId::from_parameter(document.lines().count()),
            &document,
            |b, document| b.iter(|| engine.level_document(black_box(document)).unwrap()),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_selector_matching, bench_leveling);
criterion_main!(benches);
