use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use minisql::Database;
use std::hint::black_box;

fn setup_populated_db(n: usize) -> Database {
    let mut db = Database::new();

    db.execute_statement("CREATE TABLE users (id INT, name VARCHAR(20), age INT)")
        .unwrap();
    db.execute_statement("CREATE TABLE orders (id INT, user_id INT, amount DECIMAL)")
        .unwrap();

    for i in 0..n {
        db.execute_statement(&format!(
            "INSERT INTO users VALUES ({}, 'user{}', {})",
            i,
            i,
            i % 100
        ))
        .unwrap();
        db.execute_statement(&format!(
            "INSERT INTO orders VALUES ({}, {}, {}.5)",
            i,
            (i * 7) % n,
            i % 50
        ))
        .unwrap();
    }
    db
}

fn bench_insert_sql(c: &mut Criterion) {
    let mut group = c.benchmark_group("Insert_SQL_Pipeline");
    group.bench_function("insert_single_row_sql", |b| {
        let mut db = Database::new();
        db.execute_statement("CREATE TABLE tests (id INT, label VARCHAR(10))")
            .unwrap();
        b.iter(|| {
            db.execute_statement(black_box("INSERT INTO tests VALUES (42, 'answer')"))
                .unwrap();
        });
    });
    group.finish();
}

fn bench_select_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("Select_Where_Performance");

    for n in [1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, &n| {
            let mut db = setup_populated_db(n);
            b.iter(|| {
                let res = db
                    .execute_statement("SELECT name, age FROM users WHERE age = 42 ORDER BY name")
                    .unwrap();
                black_box(res);
            });
        });
    }
    group.finish();
}

fn bench_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("Nested_Loop_Join");
    group.sample_size(10);

    for n in [100, 500].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, &n| {
            let mut db = setup_populated_db(n);
            b.iter(|| {
                let res = db
                    .execute_statement(
                        "SELECT users.name, orders.amount FROM users JOIN orders ON users.id = orders.user_id",
                    )
                    .unwrap();
                black_box(res);
            });
        });
    }
    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("Batch_Split_And_Execute");
    let batch: String = (0..200)
        .map(|i| format!("INSERT INTO users VALUES ({}, 'u{}', {}); -- row {}\n", i, i, i % 90, i))
        .collect();

    group.bench_function("insert_batch_200", |b| {
        b.iter_with_setup(
            || setup_populated_db(0),
            |mut db| {
                let results = db.execute_batch(black_box(&batch));
                black_box(results);
            },
        );
    });
    group.finish();
}

criterion_group!(benches, bench_insert_sql, bench_select_scaling, bench_join, bench_batch);
criterion_main!(benches);
