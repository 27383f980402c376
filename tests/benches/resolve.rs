use correlate::{Engine, FetchStrategy, Value, ValueRecord};
use correlate_core::QueryEngine;
use correlate_driver_memory::Memory;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use tests::fixtures::{self, slot};

fn setup_memory(documents: i64, tags_per_document: i64) -> Memory {
    let mut memory = Memory::new();
    memory.table("Tag", ["id", "document_id", "name"]);
    memory.table("Document", ["id", "title", "owner_id", "team_id"]);

    for document in 0..documents {
        memory.insert(
            "Document",
            [
                Value::I64(document),
                format!("Document {document}").into(),
                Value::I64(document % 7),
                Value::I64(document % 3),
            ],
        );

        for tag in 0..tags_per_document {
            memory.insert(
                "Tag",
                [
                    Value::I64(document * tags_per_document + tag),
                    Value::I64(document),
                    format!("tag {tag}").into(),
                ],
            );
        }
    }

    memory
}

fn resolve_benchmarks(c: &mut Criterion) {
    let sizes = [(50, 5), (200, 5)];
    let strategies = [
        ("select_1", FetchStrategy::Select { batch_size: Some(1) }),
        ("select_20", FetchStrategy::Select { batch_size: Some(20) }),
        ("subselect", FetchStrategy::Subselect),
    ];

    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("resolve_tags");
    group.sample_size(10);

    for (documents, tags) in sizes {
        let memory = setup_memory(documents, tags);
        let view = fixtures::document_view();
        let rows: Vec<ValueRecord> = rt.block_on(async {
            let query = view.primary.clone().unwrap();
            let response = memory.exec(query).await.unwrap();
            response
                .rows
                .into_values()
                .unwrap()
                .collect()
                .await
                .unwrap()
                .into_iter()
                .map(Value::unwrap_record)
                .collect()
        });
        let engine = Engine::new(memory);

        for (name, fetch) in strategies {
            let mut attr = fixtures::tags();
            attr.fetch = fetch;

            group.bench_with_input(
                BenchmarkId::new(name, format!("{documents}d_{tags}t")),
                &rows,
                |b, rows| {
                    b.iter(|| {
                        rt.block_on(async {
                            let rows = engine.resolve(&view, &attr, rows.clone()).await.unwrap();
                            black_box(rows[0][slot::TAGS].container_len())
                        })
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, resolve_benchmarks);
criterion_main!(benches);
