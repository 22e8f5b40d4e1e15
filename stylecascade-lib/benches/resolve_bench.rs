extern crate criterion;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use stylecascade_lib::style_pass::style_pass;
use stylecascade_lib::{load_rules, parse_selector, ObjectData, ObjectTree, StyleLibrary, StyleSheet};

fn bench_parse_selector(c: &mut Criterion) {
    let text = "window #main .panel:hover list item.selected label";
    c.bench_function("parse_selector", |b| b.iter(|| parse_selector(black_box(text))));
}

fn build_library() -> StyleLibrary {
    let mut rules = String::new();
    for i in 0..1_000 {
        rules.push_str(&format!(".c{} {{ width: {}px; }}\n", i, i));
        rules.push_str(&format!("window .c{} {{ height: {}px; }}\n", i, i));
    }
    rules.push_str("label { color: #333; }\n");
    let mut library = StyleLibrary::new();
    load_rules(&mut library, &rules).unwrap();
    library
}

fn bench_resolve_deep(c: &mut Criterion) {
    let library = build_library();
    let mut tree = ObjectTree::new();
    let mut chain = vec![ObjectData::new("window")];
    for i in 0..30 {
        chain.push(ObjectData::from_compound(&format!("box.c{}.c{}", i, i + 500)).unwrap());
    }
    chain.push(ObjectData::from_compound("label.c7.c8.c9").unwrap());
    let path = tree.append_path(None, chain);
    let target = path[path.len() - 1];

    c.bench_function("resolve_deep", |b| {
        b.iter(|| {
            let mut sheet = StyleSheet::new();
            library.resolve_style(&tree, black_box(target), &mut sheet)
        })
    });
}

fn bench_style_pass(c: &mut Criterion) {
    let library = build_library();
    let mut tree = ObjectTree::new();
    let root = tree.add_root(ObjectData::new("window"));
    for i in 0..10_000 {
        tree.append_child(root, ObjectData::from_compound(&format!("label.c{}", i % 1_000)).unwrap());
    }
    let handles: Vec<_> = tree.handles().collect();

    c.bench_function("style_pass_10k", |b| {
        b.iter(|| style_pass::resolve_all(&library, &tree, black_box(&handles)))
    });
}

criterion_group!(benches, bench_parse_selector, bench_resolve_deep, bench_style_pass);
criterion_main!(benches);
