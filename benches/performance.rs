// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Performance benchmarks for ARTIC
//!
//! Run with: cargo bench
//!
//! These benchmarks measure:
//! - Canonical key and XOR address throughput
//! - Condition parsing
//! - Full-project export over growing axis counts

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use artic::catalog::BuiltinCatalog;
use artic::combo::{canonical_key, combination_count, combo_address, combo_string};
use artic::condition::parse_branch;
use artic::export::build_expression_map;
use artic::project::{xor_ids, Axis, IdGenerator, Project, ProjectMeta, Technique};

fn axis(name: &str, techniques: &[&str], sort: f64, gen: &mut IdGenerator) -> Axis {
    let mut axis = Axis::with_neutral(name, sort, gen);
    for t in techniques {
        axis.techniques.push(Technique {
            id: gen.next_id(),
            name: t.to_string(),
        });
    }
    axis
}

fn bench_canonical_key(c: &mut Criterion) {
    c.bench_function("canonical_key", |b| {
        b.iter(|| canonical_key(black_box("pt.plucked+pt.nonVibrato+pt.legato+pt.staccato")))
    });
}

fn bench_xor_address(c: &mut Criterion) {
    let mut gen = IdGenerator::from_seed(1);
    let ids: Vec<String> = (0..6).map(|_| gen.next_id()).collect();
    c.bench_function("xor_address", |b| b.iter(|| xor_ids(black_box(&ids)).unwrap()));
}

fn bench_condition_parse(c: &mut Criterion) {
    c.bench_function("parse_branch", |b| {
        b.iter(|| parse_branch(black_box("short <= noteLength < veryLong")).unwrap())
    });
}

fn bench_enumeration(c: &mut Criterion) {
    let mut group = c.benchmark_group("enumerate");
    for axis_count in [2usize, 4, 6].iter() {
        let mut gen = IdGenerator::from_seed(2);
        let axes: Vec<Axis> = (0..*axis_count)
            .map(|k| {
                axis(
                    &format!("A{k}"),
                    &["Staccato", "Tenuto"],
                    k as f64,
                    &mut gen,
                )
            })
            .collect();
        let refs: Vec<&Axis> = axes.iter().collect();
        group.bench_with_input(
            BenchmarkId::new("addresses", axis_count),
            axis_count,
            |b, _| {
                b.iter(|| {
                    let count = combination_count(&refs).unwrap();
                    for k in 0..count {
                        black_box(combo_address(&refs, k).unwrap());
                    }
                })
            },
        );
    }
    group.finish();
}

fn bench_export(c: &mut Criterion) {
    let mut gen = IdGenerator::from_seed(3);
    let mut project = Project {
        id: gen.next_id(),
        ..Project::default()
    };
    let length = axis("Length", &["Staccato", "Tenuto"], 1.0, &mut gen);
    let legato = axis("Legato", &["Legato"], 2.0, &mut gen);
    project.axes.insert(length.id.clone(), length);
    project.axes.insert(legato.id.clone(), legato);

    // Assign a sound to every combination so export does full work.
    let axes = project.sorted_axes();
    let count = combination_count(&axes).unwrap();
    let mut assignments = Vec::new();
    for k in 0..count {
        let address = combo_address(&axes, k).unwrap();
        let name = combo_string(&axes, k, &BuiltinCatalog).unwrap();
        assignments.push((address, name));
    }
    for (address, name) in assignments {
        let sound = artic::project::Sound {
            id: gen.next_id(),
            name,
            midi: "KS24, CC1=64".into(),
            stop: String::new(),
            dynamics: "velocity 1:127".into(),
        };
        let id = sound.id.clone();
        project.sounds.insert(id.clone(), sound);
        project
            .assignments
            .insert(address, artic::project::Assignment { sound: id });
    }
    let meta = ProjectMeta {
        name: "Bench".into(),
        ..ProjectMeta::default()
    };

    c.bench_function("export_full_project", |b| {
        b.iter(|| build_expression_map(black_box(&meta), black_box(&project), &BuiltinCatalog).unwrap())
    });
}

criterion_group!(
    benches,
    bench_canonical_key,
    bench_xor_address,
    bench_condition_parse,
    bench_enumeration,
    bench_export
);
criterion_main!(benches);
