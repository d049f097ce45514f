// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Benchmarks for the point ledger.
//!
//! Run with: cargo bench
//!
//! Benchmarks include:
//! - Single-threaded operation throughput
//! - Multi-threaded traffic on one user vs. many users
//! - Contention scaling with the number of distinct users

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use point_ledger_rs::{Ledger, UserId};
use rayon::prelude::*;
use std::sync::Arc;

// =============================================================================
// Single-Threaded Benchmarks
// =============================================================================

fn bench_single_charge(c: &mut Criterion) {
    c.bench_function("single_charge", |b| {
        b.iter(|| {
            let ledger = Ledger::in_memory();
            ledger.charge(black_box(UserId(1)), black_box(100)).unwrap();
        })
    });
}

fn bench_charge_use_pair(c: &mut Criterion) {
    c.bench_function("charge_use_pair", |b| {
        b.iter(|| {
            let ledger = Ledger::in_memory();
            ledger.charge(UserId(1), 100).unwrap();
            ledger.use_points(black_box(UserId(1)), black_box(50)).unwrap();
        })
    });
}

fn bench_charge_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("charge_throughput");

    for count in [100, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.iter(|| {
                let ledger = Ledger::in_memory();
                for _ in 0..count {
                    // Zero amounts never hit the ceiling, so every call
                    // takes the full write path.
                    ledger.charge(UserId(1), 0).unwrap();
                }
                black_box(&ledger);
            })
        });
    }
    group.finish();
}

fn bench_balance_read(c: &mut Criterion) {
    c.bench_function("balance_read", |b| {
        let ledger = Ledger::in_memory();
        ledger.charge(UserId(1), 5_000).unwrap();
        b.iter(|| ledger.balance(black_box(UserId(1))).unwrap())
    });
}

fn bench_history_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("history_read");

    for entries in [10, 100, 1_000].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(entries),
            entries,
            |b, &entries| {
                let ledger = Ledger::in_memory();
                for _ in 0..entries {
                    ledger.charge(UserId(1), 0).unwrap();
                }
                b.iter(|| black_box(ledger.history(UserId(1)).unwrap()))
            },
        );
    }
    group.finish();
}

// =============================================================================
// Multi-Threaded Benchmarks
// =============================================================================

fn bench_parallel_charges_same_user(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_charges_same_user");

    for count in [1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.iter(|| {
                let ledger = Arc::new(Ledger::in_memory());

                (0..count).into_par_iter().for_each(|_| {
                    ledger.charge(UserId(1), 0).unwrap();
                });

                black_box(&ledger);
            })
        });
    }
    group.finish();
}

fn bench_parallel_charges_different_users(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_charges_different_users");

    for count in [1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.iter(|| {
                let ledger = Arc::new(Ledger::in_memory());

                (0..count).into_par_iter().for_each(|i| {
                    let user = UserId((i % 1_000) + 1);
                    ledger.charge(user, 0).unwrap();
                });

                black_box(&ledger);
            })
        });
    }
    group.finish();
}

fn bench_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("contention");
    let total_ops = 10_000i64;

    // Fewer users = more contention (more threads competing for the same
    // per-user lock).
    for num_users in [1, 10, 100, 1_000].iter() {
        group.throughput(Throughput::Elements(total_ops as u64));
        group.bench_with_input(
            BenchmarkId::new("users", num_users),
            num_users,
            |b, &num_users| {
                b.iter(|| {
                    let ledger = Arc::new(Ledger::in_memory());

                    (0..total_ops).into_par_iter().for_each(|i| {
                        let user = UserId((i % num_users) + 1);
                        ledger.charge(user, 0).unwrap();
                    });

                    black_box(&ledger);
                })
            },
        );
    }
    group.finish();
}

fn bench_parallel_mixed_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_mixed_operations");

    for num_users in [10, 100].iter() {
        let ops_per_user = 100i64;
        group.throughput(Throughput::Elements((*num_users * ops_per_user * 2) as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(num_users),
            num_users,
            |b, &num_users| {
                b.iter(|| {
                    let ledger = Arc::new(Ledger::in_memory());

                    (0..num_users).into_par_iter().for_each(|user| {
                        let user = UserId(user + 1);
                        for _ in 0..ops_per_user {
                            ledger.charge(user, 10).unwrap();
                            ledger.use_points(user, 10).unwrap();
                        }
                    });

                    black_box(&ledger);
                })
            },
        );
    }
    group.finish();
}

// =============================================================================
// Criterion Groups
// =============================================================================

criterion_group!(
    single_threaded,
    bench_single_charge,
    bench_charge_use_pair,
    bench_charge_throughput,
    bench_balance_read,
    bench_history_read,
);

criterion_group!(
    multi_threaded,
    bench_parallel_charges_same_user,
    bench_parallel_charges_different_users,
    bench_contention,
    bench_parallel_mixed_operations,
);

criterion_main!(single_threaded, multi_threaded);
