use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use lib::search::DEFAULT_NODE_LIMIT;
use lib::{MinimaxAgent, Scenario, SearchConfig};
use std::hint::black_box;

const BOARD: &str =
    "6 6 A\n20 5 2 30 1\n20 4 3 30 1\n2\n2 0 0 0\n0 2 0 0\nA A1 o0 B4 m C3 o1 E2 m F5 B F6 \n";

/// Full decisions at growing depth
fn bench_decide(c: &mut Criterion) {
    let scenario: Scenario = BOARD.parse().expect("the bench board is valid");
    let mut group = c.benchmark_group("decide");
    for depth in [1, 2, 3] {
        let agent = MinimaxAgent::new(SearchConfig {
            depth,
            node_limit: None,
        });
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, _| {
            b.iter(|| {
                black_box(agent.decide(
                    black_box(&scenario.arena),
                    black_box(&scenario.state),
                    scenario.side,
                ))
            })
        });
    }
    group.finish();
}

/// Default depth and node cap, the way the binary runs out of the box
fn bench_decide_capped(c: &mut Criterion) {
    let scenario: Scenario = BOARD.parse().expect("the bench board is valid");
    let agent = MinimaxAgent::new(SearchConfig {
        node_limit: Some(DEFAULT_NODE_LIMIT),
        ..SearchConfig::default()
    });
    c.bench_function("decide_capped", |b| {
        b.iter(|| black_box(agent.decide(&scenario.arena, &scenario.state, scenario.side)))
    });
}

criterion_group!(benches, bench_decide, bench_decide_capped);
criterion_main!(benches);
