use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use std::rc::Rc;

use vibra::{Store, SubscribeOptions};

fn store_creation_benchmark(c: &mut Criterion) {
    c.bench_function("store_creation", |b| {
        b.iter(|| {
            let store: Store<i32> = Store::new(black_box(42));
            store
        });
    });
}

fn store_read_benchmark(c: &mut Criterion) {
    let store = Store::new(42);

    c.bench_function("store_read", |b| {
        b.iter(|| {
            black_box(store.get());
        });
    });
}

fn store_write_benchmark(c: &mut Criterion) {
    let store = Store::new(0);

    c.bench_function("store_write", |b| {
        let mut i = 0;
        b.iter(|| {
            store.set(black_box(i));
            i += 1;
        });
    });
}

fn store_unchanged_write_benchmark(c: &mut Criterion) {
    #[derive(Debug)]
    struct State {
        counter: usize,
        name: String,
    }

    let state = Rc::new(State {
        counter: 0,
        name: "test".to_string(),
    });
    let store = Store::new(Rc::clone(&state));
    store.subscribe(|state| {
        black_box((state.counter, state.name.len()));
    });

    c.bench_function("store_unchanged_write", |b| {
        b.iter(|| {
            store.set(black_box(Rc::clone(&state)));
        });
    });
}

fn store_subscribe_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_subscribe");

    for subscriber_count in [1, 10, 100].iter() {
        let store = Store::new(0usize);

        for _ in 0..*subscriber_count {
            store.subscribe(|_| {
                // Empty subscriber
            });
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(subscriber_count),
            subscriber_count,
            |b, _| {
                let mut i = 0;
                b.iter(|| {
                    store.set(black_box(i));
                    i += 1;
                });
            },
        );
    }
    group.finish();
}

fn subscription_churn_benchmark(c: &mut Criterion) {
    let store = Store::new(0);
    let options = SubscribeOptions::new().call_on_subscribe(true);

    c.bench_function("subscription_churn", |b| {
        b.iter(|| {
            let handle = store.subscribe_with(
                |value| {
                    black_box(*value);
                },
                options,
            );
            handle.unsubscribe();
        });
    });
}

criterion_group!(
    benches,
    store_creation_benchmark,
    store_read_benchmark,
    store_write_benchmark,
    store_unchanged_write_benchmark,
    store_subscribe_benchmark,
    subscription_churn_benchmark,
);
criterion_main!(benches);
