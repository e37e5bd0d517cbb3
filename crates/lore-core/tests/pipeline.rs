//! End-to-end behavior of the document pipeline and the code index.

#![allow(clippy::unwrap_used)]

use lore_core::search::{MatchType, find_related, similarity};
use lore_core::toc::flatten;
use lore_core::{
    CodeBlockConfig, CodeSample, Config, Glossary, IdStrategy, IndexExport, IndexGeneration, SearchFilter, SearchOptions,
    build_index, detect_vocabulary, extract_metadata, process_document, process_document_with, search,
};

fn sample(id: &str, title: &str, code: &str) -> CodeSample {
    CodeSample {
        id: id.to_string(),
        title: title.to_string(),
        code: code.to_string(),
        language: "typescript".to_string(),
        categories: vec!["reactivity".to_string()],
        tags: Vec::new(),
        difficulty: 2,
        popularity: 0.5,
        concept_path: "signals".to_string(),
        last_modified: None,
        is_constitutional: false,
    }
}

#[test]
fn heading_only_document() {
    let doc = process_document("# Hello World\n\nText.");

    assert_eq!(doc.headings.len(), 1);
    assert_eq!(doc.headings[0].id, "hello-world");
    assert!(doc.code_blocks.is_empty());
}

#[test]
fn two_fenced_blocks_keep_languages_and_order() {
    let raw = "# Demo\n\n```typescript\nconst a: number = 1;\n```\n\nBetween.\n\n```javascript\nconst b = 2;\n```\n";

    let doc = process_document(raw);

    let langs: Vec<_> = doc.code_blocks.iter().map(|b| b.language.as_str()).collect();
    assert_eq!(langs, ["typescript", "javascript"]);

    let seqs: Vec<u32> = doc
        .code_blocks
        .iter()
        .map(|b| b.id.split('-').nth(1).unwrap().parse().unwrap())
        .collect();
    assert!(seqs[0] > 0 && seqs[1] > seqs[0]);
}

#[test]
fn metadata_is_split_from_body() {
    let extracted = extract_metadata("---\ntitle: X\ncategory: Y\n---\n# Content");

    assert_eq!(extracted.metadata.as_ref().unwrap().title.as_deref(), Some("X"));
    assert!(extracted.body.contains("# Content"));
    assert!(!extracted.body.contains("---"));
}

#[test]
fn long_block_is_collapsible() {
    let code: String = (1..=25).map(|i| format!("console.log({i});\n")).collect();
    let doc = process_document(&format!("```javascript\n{code}```\n"));

    let block = &doc.code_blocks[0];
    assert_eq!(block.line_count, 25);
    assert!(block.is_collapsible);
    assert!(block.show_line_numbers);
}

#[test]
fn malformed_sample_is_skipped() {
    let samples = vec![
        sample("broken", "Broken", ""),
        sample("ok", "Counter", "const count = signal(0);"),
    ];

    let index = build_index(&samples);

    assert_eq!(index.entries.len(), 1);
    assert_eq!(index.stats.skipped, 1);
    assert_eq!(index.stats.total_entries, 1);
}

#[test]
fn unclosed_header_leaves_text_unchanged() {
    let raw = "---\ntitle: X\n# Content";
    let extracted = extract_metadata(raw);
    assert!(extracted.metadata.is_none());
    assert_eq!(extracted.body, raw);
}

#[test]
fn toc_preorder_matches_heading_order() {
    let raw = "# A\n## B\n### C\n## D\n# E\n#### F\n## G";
    let doc = process_document(raw);

    let toc_ids: Vec<_> = flatten(&doc.toc).iter().map(|s| s.id.clone()).collect();
    let heading_ids: Vec<_> = doc.headings.iter().map(|h| h.id.clone()).collect();
    assert_eq!(toc_ids, heading_ids);
}

#[test]
fn sequential_ids_are_stable_across_runs() {
    let config = Config {
        code_blocks: CodeBlockConfig {
            id_strategy: IdStrategy::Sequential,
            ..CodeBlockConfig::default()
        },
        ..Config::default()
    };
    let raw = "```rust\nfn main() {}\n```\n";

    let first = process_document_with(raw, &config);
    let second = process_document_with(raw, &config);
    assert_eq!(first.code_blocks, second.code_blocks);
    assert_eq!(first.code_blocks[0].id, "code-1");
}

#[test]
fn search_is_deterministic_across_identical_indexes() {
    let samples: Vec<_> = (0..30)
        .map(|i| sample(&format!("s{i}"), &format!("Signal demo {}", i % 4), "const s = signal(1);"))
        .collect();

    let a = build_index(&samples);
    let b = build_index(&samples);
    let ids = |index: &IndexGeneration| {
        search::search(index, "signal", &SearchFilter::default(), &SearchOptions::default())
            .into_iter()
            .map(|hit| hit.entry.id.clone())
            .collect::<Vec<_>>()
    };

    assert_eq!(ids(&a), ids(&b));
}

#[test]
fn typo_still_finds_sample() {
    let index = build_index(&[sample("eff", "Logging", "effect(() => console.log(count()));")]);

    let hits = search::search(&index, "efect", &SearchFilter::default(), &SearchOptions::default());

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].match_type, MatchType::Fuzzy);
}

#[test]
fn similarity_properties() {
    assert!((similarity("angular", "angular") - 1.0).abs() < f64::EPSILON);
    assert!(similarity("angular", "xyz123") < 0.7);
}

#[test]
fn related_samples_share_language_and_category() {
    let mut other = sample("py", "Python", "print(1)");
    other.language = "python".to_string();
    other.categories = vec!["scripting".to_string()];
    let index = build_index(&[
        sample("a", "Counter", "const a = signal(0);"),
        sample("b", "Doubler", "const b = signal(1);"),
        other,
    ]);

    let related = find_related(&index, "a", 0.3, 5);
    assert_eq!(related.len(), 1);
    assert_eq!(related[0].entry.id, "b");
}

#[test]
fn export_survives_round_trip_through_json() {
    let index = build_index(&[sample("a", "Counter", "const a = signal(0);")]);
    let json = IndexExport::from_generation(&index).to_json().unwrap();

    let restored = IndexExport::from_json(&json).unwrap().into_generation(index.generation);
    let hits = search::search(&restored, "counter", &SearchFilter::default(), &SearchOptions::default());
    assert_eq!(hits[0].entry.id, "a");
}

#[test]
fn vocabulary_over_processed_body() {
    let glossary = Glossary::from_json(
        r#"[{"term": "Signal", "definition": "A reactive value", "keywords": ["signals"], "category": "reactivity"}]"#,
    )
    .unwrap();
    let doc = process_document("---\ntitle: T\n---\n# Intro\n\nA Signal holds state.");

    let matches = detect_vocabulary(&glossary, &doc.body, 0.7);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].term, "Signal");
}
