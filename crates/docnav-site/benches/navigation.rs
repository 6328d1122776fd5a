//! Benchmarks for navigation building.

use std::path::PathBuf;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use docnav_config::EntryDecl;
use docnav_site::{ContentDocument, ContentRegistry, NavigationBuilder};

/// Create a registry and a sidebar with `sections` groups of `items` leaves.
fn create_site(sections: usize, items: usize) -> (ContentRegistry, Vec<EntryDecl>) {
    let mut documents = Vec::with_capacity(sections * items);
    let mut sidebar = Vec::with_capacity(sections);

    for s in 0..sections {
        let leaves = (0..items)
            .map(|i| {
                let path = format!("section-{s}/page-{i}");
                documents.push(ContentDocument {
                    source_path: PathBuf::from(format!("{path}.md")),
                    title: format!("Page {i}"),
                    description: None,
                    last_updated: 0,
                    path: path.clone(),
                });
                EntryDecl::leaf(format!("Page {i}"), format!("/{path}.md"))
            })
            .collect();
        sidebar.push(EntryDecl::group(format!("Section {s}"), leaves));
    }

    (ContentRegistry::from_documents(documents), sidebar)
}

fn bench_build_navigation(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_navigation");

    for (sections, items) in [(5, 10), (20, 50), (50, 100)] {
        let (registry, sidebar) = create_site(sections, items);
        let builder = NavigationBuilder::new(&registry);
        group.bench_with_input(
            BenchmarkId::from_parameter(sections * items),
            &sidebar,
            |b, sidebar| b.iter(|| builder.build(&[], sidebar)),
        );
    }

    group.finish();
}

fn bench_resolve_link(c: &mut Criterion) {
    let (registry, _) = create_site(20, 50);

    let mut group = c.benchmark_group("resolve_link");

    group.bench_function("hit", |b| {
        b.iter(|| registry.resolve("/section-10/page-25.md"))
    });

    group.bench_function("miss", |b| b.iter(|| registry.resolve("/nonexistent.md")));

    group.finish();
}

criterion_group!(benches, bench_build_navigation, bench_resolve_link);
criterion_main!(benches);
