use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use gym_ops::services::clean_records;

/// Synthetic raw feed with a mix of valid and droppable rows.
fn synthetic_feed(rows: usize) -> String {
    let mut feed = String::from(
        "event_id,timestamp,date,location,member_id,membership_tier,activity_type,class_name,equipment_used,duration_min,spend_cad\n",
    );
    for i in 0..rows {
        let day = i % 28 + 1;
        let hour = i % 24;
        let (activity, class, equipment) = if i % 3 == 0 {
            ("Class", "Yoga", "")
        } else {
            ("Gym Visit", "", "Treadmill")
        };
        // Every 10th row has an out-of-range duration
        let duration = if i % 10 == 0 { 400 } else { 20 + i % 90 };
        feed.push_str(&format!(
            "{i},2024-02-{day:02} {hour:02}:15:00,2024-02-{day:02}, Downtown ,{},Basic,{activity},{class},{equipment},{duration},{}\n",
            i % 500,
            if i % 4 == 0 { "" } else { "9.99" },
        ));
    }
    feed
}

fn benchmark_clean(c: &mut Criterion) {
    let feed = synthetic_feed(10_000);

    let mut group = c.benchmark_group("cleaner");

    group.bench_function("clean_10k_rows", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(feed.len());
            clean_records(black_box(feed.as_bytes()), &mut out).expect("clean failed")
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_clean);
criterion_main!(benches);
