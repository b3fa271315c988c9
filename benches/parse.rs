// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use seqlens::{generate, parse, Dialect};

mod fixtures;

// Benchmark identity (keep stable):
// - Group names in this file: `format.parse.<dialect>`, `format.generate.<dialect>`
// - Case IDs (the string after the `/`) must remain stable across refactors so
//   results stay comparable over time (`small`, `medium`, `large_long_text`).
fn benches_parse(c: &mut Criterion) {
    for dialect in [Dialect::Mermaid, Dialect::PlantUml] {
        let mut group = c.benchmark_group(format!("format.parse.{}", dialect.name()));

        for case in fixtures::seq::Case::ALL {
            let ast = fixtures::seq::fixture(case);
            let text = generate(dialect, &ast);
            group.throughput(Throughput::Bytes(text.len() as u64));
            group.bench_function(case.id(), move |b| {
                b.iter(|| {
                    let parsed = parse(dialect, black_box(&text)).expect("parse");
                    black_box(fixtures::checksum_sequence(black_box(&parsed)))
                })
            });
        }

        group.finish();
    }
}

fn benches_generate(c: &mut Criterion) {
    for dialect in [Dialect::Mermaid, Dialect::PlantUml] {
        let mut group = c.benchmark_group(format!("format.generate.{}", dialect.name()));

        for case in fixtures::seq::Case::ALL {
            let ast = fixtures::seq::fixture(case);
            group.throughput(Throughput::Elements(ast.event_count() as u64));
            group.bench_function(case.id(), move |b| {
                b.iter(|| black_box(generate(dialect, black_box(&ast)).len()))
            });
        }

        group.finish();
    }
}

criterion_group!(benches, benches_parse, benches_generate);
criterion_main!(benches);
