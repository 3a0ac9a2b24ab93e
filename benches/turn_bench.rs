use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use region_economy::region::RegionSpec;
use region_economy::resources::ResourceSpec;
use region_economy::{EconomyConfig, Simulation};

const REGIONS: usize = 200;

fn build() -> Simulation {
    let resources = vec![
        ResourceSpec::raw("Food", 10.0).essential(0.2).with_perish_rate(0.1),
        ResourceSpec::raw("Timber", 6.0).with_consumption(0.02),
        ResourceSpec::raw("Ore", 8.0),
        ResourceSpec::raw("Cloth", 15.0).with_consumption(0.01),
    ];
    let names = ["Food", "Timber", "Ore", "Cloth"];

    let regions: Vec<RegionSpec> = (0..REGIONS)
        .map(|idx| {
            let name = format!("Region {:04}", idx);
            let mut spec = RegionSpec::new(name, format!("Nation {}", idx % 7))
                .with_economy(500, 40, 100 + (idx as u32 % 50))
                .with_baseline(names[idx % names.len()], 60.0)
                .with_baseline("Food", 15.0);
            if idx + 1 < REGIONS {
                spec = spec.with_neighbor(&format!("Region {:04}", idx + 1));
            }
            spec
        })
        .collect();

    Simulation::with_region_graph(&resources, &regions, EconomyConfig::default())
        .unwrap_or_else(|e| panic!("bench scenario invalid: {}", e))
}

fn bench_advance_turn(c: &mut Criterion) {
    c.bench_function("advance_turn_200_regions", |b| {
        b.iter_batched(
            build,
            |mut sim| black_box(sim.advance_turn().is_ok()),
            BatchSize::SmallInput,
        )
    });

    c.bench_function("advance_10_turns_200_regions", |b| {
        b.iter_batched(
            build,
            |mut sim| {
                for _ in 0..10 {
                    black_box(sim.advance_turn().is_ok());
                }
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_advance_turn);
criterion_main!(benches);
