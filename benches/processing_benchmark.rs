// Processing benchmarks
// Author: Gabriel Demetrios Lafis

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use student_analytics_engine::{
    api::QueryEngine,
    data::{Course, Student, Value},
    processing::{group_by, key, median, pearson_correlation, GroupByProcessor, Predicate},
    storage::RecordStore,
};

const MAJORS: [&str; 5] = ["Physics", "Biology", "History", "Economics", "Mathematics"];

fn generate_store(count: u32) -> RecordStore {
    let mut rng = StdRng::seed_from_u64(2024);

    let students = (1..=count)
        .map(|id| Student {
            id,
            name: format!("Student {}", id),
            age: rng.gen_range(18..35),
            major: MAJORS[rng.gen_range(0..MAJORS.len())].to_string(),
            gpa: rng.gen_range(0.0..=4.0),
            enrollment_date: NaiveDate::from_ymd_opt(2018 + rng.gen_range(0..6), 9, 1).unwrap(),
            email: format!("s{}@university.edu", id),
            address: None,
            courses: (0..4)
                .map(|n| Course {
                    code: format!("C{}{}", id, n),
                    name: format!("Course {}", n),
                    credits: rng.gen_range(1..5),
                    grade: rng.gen_range(0.0..=4.0),
                    semester: "Fall 2023".to_string(),
                    instructor: "Staff".to_string(),
                })
                .collect(),
        })
        .collect();

    RecordStore::new(students).unwrap()
}

fn bench_filter(c: &mut Criterion) {
    let store = generate_store(10_000);
    let predicate = Predicate::<Student>::greater_than("gpa", 3.5).unwrap();

    c.bench_function("filter_gpa_10k", |b| {
        b.iter(|| predicate.filter(black_box(&store)).count())
    });
}

fn bench_group_by(c: &mut Criterion) {
    let store = generate_store(10_000);

    c.bench_function("group_by_major_10k", |b| {
        b.iter(|| {
            group_by(
                black_box(&store),
                &[key(|s: &Student| Value::from(s.major.as_str()))],
            )
            .unwrap()
            .len()
        })
    });

    let processor = GroupByProcessor::<Student>::new()
        .group_by_field("major")
        .unwrap()
        .count("students")
        .avg("mean_gpa", |s| s.gpa);

    c.bench_function("aggregate_major_10k", |b| {
        b.iter(|| processor.process(black_box(&store)).unwrap())
    });
}

fn bench_stats(c: &mut Criterion) {
    let store = generate_store(10_000);
    let engine = QueryEngine::new(&store);
    let ages = engine.field_values("age").unwrap();
    let gpas = engine.field_values("gpa").unwrap();

    c.bench_function("median_10k", |b| b.iter(|| median(black_box(&gpas)).unwrap()));
    c.bench_function("pearson_10k", |b| {
        b.iter(|| pearson_correlation(black_box(&ages), black_box(&gpas)).unwrap())
    });
}

fn bench_pivot(c: &mut Criterion) {
    let store = generate_store(2_500);
    let engine = QueryEngine::new(&store);

    c.bench_function("pivot_grades_10k_enrollments", |b| {
        b.iter(|| engine.grade_distribution_by_major().unwrap())
    });
}

criterion_group!(benches, bench_filter, bench_group_by, bench_stats, bench_pivot);
criterion_main!(benches);
