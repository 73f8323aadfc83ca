use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use week_timeline::core::{
    LanePolicy, LayoutConstants, Row, RowKey, RowModel, ScheduleItem, SchedulePayload,
    WidthClipPolicy, layout_row, pack_lanes,
};

fn generated_items(count: usize) -> Vec<ScheduleItem> {
    (0..count)
        .map(|i| {
            let start = (i % 11) as i64 - 2;
            let span = (i % 5) as i64 + 1;
            ScheduleItem::task(format!("item-{i}"), "Generated", start, span)
        })
        .collect()
}

fn bench_lane_packing_1k(c: &mut Criterion) {
    let items = generated_items(1_000);

    c.bench_function("lane_packing_per_item_1k", |b| {
        b.iter(|| {
            let _ = pack_lanes(black_box(&items), LanePolicy::PerItem);
        })
    });
    c.bench_function("lane_packing_overlap_aware_1k", |b| {
        b.iter(|| {
            let _ = pack_lanes(black_box(&items), LanePolicy::OverlapAware);
        })
    });
}

fn bench_row_layout_1k(c: &mut Criterion) {
    let row = Row {
        key: RowKey::Unassigned,
        display_name: "Unassigned".to_owned(),
        items: generated_items(1_000),
    };

    c.bench_function("row_layout_1k", |b| {
        b.iter(|| {
            let _ = layout_row(
                black_box(&row),
                LayoutConstants::default(),
                LanePolicy::PerItem,
                WidthClipPolicy::ClipToWindow,
            );
        })
    });
}

fn bench_row_model_build_json(c: &mut Criterion) {
    let json = SchedulePayload::new()
        .with_unassigned(generated_items(2_000))
        .to_json_pretty()
        .expect("serialize payload");

    c.bench_function("row_model_build_json_2k", |b| {
        b.iter(|| {
            let payload = SchedulePayload::from_json_str(black_box(&json)).expect("parse payload");
            let _ = RowModel::build(payload, "Unassigned");
        })
    });
}

criterion_group!(
    benches,
    bench_lane_packing_1k,
    bench_row_layout_1k,
    bench_row_model_build_json
);
criterion_main!(benches);
