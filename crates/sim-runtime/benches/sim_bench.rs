use criterion::{criterion_group, criterion_main, Criterion};
use sim_core::crops::CropSpec;
use sim_core::plots::{Plot, PlotCalendar};
use sim_core::CropId;
use std::collections::BTreeMap;

fn bench_year(c: &mut Criterion) {
    let mut tiles_by_crop = BTreeMap::new();
    tiles_by_crop.insert("starfruit".to_string(), 58);
    tiles_by_crop.insert("ancient".to_string(), 58);
    let input = sim_runtime::PipelineInput {
        crops: vec![CropSpec::starfruit(), CropSpec::ancient_fruit()],
        plots: vec![Plot {
            name: "greenhouse".to_string(),
            tiles_by_crop,
            calendar: PlotCalendar::Always,
        }],
        kegs: 64,
        casks: 33,
        preserves_jars: 16,
        dehydrators: 4,
        priority_crop: Some(CropId::from("starfruit")),
        ..sim_runtime::PipelineInput::default()
    };
    c.bench_function("simulate_year", |b| {
        b.iter(|| sim_runtime::simulate_year(&input))
    });
}

criterion_group!(benches, bench_year);
criterion_main!(benches);
