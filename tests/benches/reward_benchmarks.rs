//! # Eco-Rewards Benchmarks
//!
//! Hot paths behind user-facing commands:
//!
//! | Subsystem | Operation |
//! |-----------|-----------|
//! | eco-01 Ledger | credit on a long ledger |
//! | eco-02 Quest Engine | catalog merge, completion with credit |
//! | eco-03 Coupon Registry | issue with code generation, brand lookup |

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use eco_01_ledger::{LedgerApi, LedgerService};
use eco_02_quest_engine::{merge_catalog, seed_challenges, QuestEngineApi, QuestEngineService};
use eco_03_coupon_registry::{
    CouponRegistryApi, CouponRegistryService, RewardCouponPolicy, ThreadRandomSource,
};
use eco_runtime::adapters::LedgerAdapter;
use eco_runtime::EngineConfig;
use shared_types::{ChallengeId, MockTimeSource};

const NOW: u64 = 1_736_499_600_000;

fn clock() -> Arc<MockTimeSource> {
    Arc::new(MockTimeSource::new(NOW))
}

fn bench_ledger_credit(c: &mut Criterion) {
    let mut group = c.benchmark_group("eco-01-ledger");

    for history in [10usize, 1_000, 10_000] {
        let ledger = LedgerService::with_opening_balance(clock(), 850).unwrap();
        for _ in 0..history {
            ledger.credit(5, "Daily check-in reward").unwrap();
        }
        group.bench_with_input(BenchmarkId::new("credit", history), &ledger, |b, ledger| {
            b.iter(|| black_box(ledger.credit(1, "bench").unwrap()))
        });
    }

    group.finish();
}

fn bench_quest_completion(c: &mut Criterion) {
    let mut group = c.benchmark_group("eco-02-quest-engine");
    let curve = EngineConfig::default().quests.curve();

    group.bench_function("merge_catalog", |b| {
        let persisted = seed_challenges();
        b.iter(|| black_box(merge_catalog(seed_challenges(), persisted.clone())))
    });

    group.bench_function("complete_with_credit", |b| {
        b.iter_batched(
            || {
                let clock = clock();
                let ledger = Arc::new(
                    LedgerService::with_opening_balance(clock.clone(), 850).unwrap(),
                );
                QuestEngineService::new(
                    seed_challenges(),
                    1_250,
                    curve,
                    Arc::new(LedgerAdapter::new(ledger)),
                    clock,
                )
            },
            |quests| black_box(quests.complete(&ChallengeId::from("default-1")).unwrap()),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_coupon_issue(c: &mut Criterion) {
    let mut group = c.benchmark_group("eco-03-coupon-registry");
    let validity = chrono::Duration::days(30);

    for wallet in [0usize, 1_000] {
        let registry = CouponRegistryService::new(
            RewardCouponPolicy::default(),
            Arc::new(ThreadRandomSource),
            clock(),
        );
        for _ in 0..wallet {
            registry
                .issue("EcoGreen", "10% off", validity, None)
                .unwrap();
        }

        group.bench_with_input(BenchmarkId::new("issue", wallet), &registry, |b, registry| {
            b.iter(|| black_box(registry.issue("GreenLiving", "15% off", validity, None).unwrap()))
        });
        group.bench_with_input(
            BenchmarkId::new("available_for_brand", wallet),
            &registry,
            |b, registry| b.iter(|| black_box(registry.available_for_brand("ecogreen"))),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_ledger_credit,
    bench_quest_completion,
    bench_coupon_issue
);
criterion_main!(benches);
