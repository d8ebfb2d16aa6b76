use assembly::GraphCollector;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ito_core::model::{EntityEdge, EntityNode, EntityPath, RawValue};

// Chains of `chain_len` nodes; consecutive chains share no entities.
fn sample_paths(chains: usize, chain_len: usize) -> Vec<RawValue> {
    (0..chains)
        .map(|chain| {
            let nodes: Vec<EntityNode> = (0..chain_len)
                .map(|index| {
                    EntityNode::new(format!("4:c{chain}:{index}"), ["法人"])
                        .with_property("node_id", (chain * chain_len + index) as i64)
                })
                .collect();
            let edges = nodes
                .windows(2)
                .enumerate()
                .map(|(index, pair)| {
                    EntityEdge::new(
                        format!("5:c{chain}:{index}"),
                        "役員",
                        pair[0].identity.clone(),
                        pair[1].identity.clone(),
                    )
                })
                .collect();
            RawValue::Path(EntityPath::new(nodes, edges))
        })
        .collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let values = sample_paths(200, 25);

    c.bench_function("extract 5k nodes", |b| {
        b.iter(|| {
            let mut collector = GraphCollector::new();
            for value in &values {
                collector.extract(black_box(value));
            }
            collector
        })
    });

    let mut collector = GraphCollector::new();
    for value in &values {
        collector.extract(value);
    }
    c.bench_function("partition 200 components", |b| {
        b.iter(|| black_box(collector.partition()))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
