#![allow(dead_code)]

use criterion::{criterion_group, criterion_main, Criterion};
use wirebox::{Container, Injectable, Injector, Slot};

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("resolve_singleton", |b| {
        #[derive(Default)]
        struct A;

        impl Injectable for A {}

        let container = Container::new();
        container.register_singleton::<A>();
        b.iter(|| container.resolve_of::<A>().unwrap());
    })
    .bench_function("resolve_transient_with_dependency", |b| {
        #[derive(Default)]
        struct Leaf;

        impl Injectable for Leaf {}

        #[derive(Default)]
        struct Node {
            leaf: Slot<Leaf>,
        }

        impl Injectable for Node {
            fn inject(&self, injector: &Injector<'_>) {
                injector.service("", &self.leaf);
            }
        }

        let container = Container::new();
        container.register_singleton::<Leaf>();
        container.register_transient::<Node>();
        b.iter(|| container.resolve_of::<Node>().unwrap());
    })
    .bench_function("resolve_value", |b| {
        let container = Container::new();
        container.register_value("bench/value", 1i64);
        b.iter(|| container.resolve_as::<i64>("bench/value").unwrap());
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
