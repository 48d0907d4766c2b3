use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use dblib::{DriverEscape, Escaper, Join, JoinKind, SlashCodec, Spec, Value, Values};

struct RawEscape;

impl DriverEscape for RawEscape {
    fn escape_str(&self, raw: &str) -> String {
        raw.replace('\\', r"\\").replace('\'', r"\'")
    }
}

/// A field list of `n` aliased columns: `col0 AS c0, col1 AS c1, ...`.
fn field_spec(n: usize) -> Spec {
    Spec::Many((0..n).map(|i| format!("col{i} AS c{i}")).collect())
}

/// An option fragment with `n` placeholders and its bound values.
fn option_fragment(n: usize) -> (String, Values) {
    let mut opt = String::from("WHERE ");
    for i in 0..n {
        if i > 0 {
            opt.push_str(" AND ");
        }
        opt.push_str(&format!("col{i} = ?"));
    }
    let values = Values::Many((0..n).map(|i| Value::Text(format!("value-{i}'s"))).collect());
    (opt, values)
}

fn bench_quote_fields(c: &mut Criterion) {
    let codec = SlashCodec;
    let escaper = Escaper::new(&RawEscape, &codec, true);
    let mut group = c.benchmark_group("escape/quote_fields");

    for n in [1, 5, 10, 50, 100] {
        let fields = field_spec(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &fields, |b, fields| {
            b.iter(|| black_box(dblib::stmt::build_select(&escaper, fields)));
        });
    }

    group.finish();
}

fn bench_substitute(c: &mut Criterion) {
    let codec = SlashCodec;
    let escaper = Escaper::new(&RawEscape, &codec, true);
    let mut group = c.benchmark_group("subst/substitute");

    for n in [1, 5, 10, 50, 100] {
        let (opt, values) = option_fragment(n);
        group.bench_with_input(
            BenchmarkId::from_parameter(n),
            &(opt, values),
            |b, (opt, values)| {
                b.iter(|| black_box(dblib::substitute(opt, values, &escaper).unwrap()));
            },
        );
    }

    group.finish();
}

fn bench_join_clause(c: &mut Criterion) {
    let codec = SlashCodec;
    let escaper = Escaper::new(&RawEscape, &codec, true);
    let joins: Vec<Join> = (0..4)
        .map(|i| {
            Join::new(
                JoinKind::Left,
                format!("t{i}"),
                format!("base.fk{i}"),
                format!("t{i}.id"),
            )
        })
        .collect();

    c.bench_function("stmt/build_join/4", |b| {
        b.iter(|| black_box(dblib::stmt::build_join(&escaper, &joins)));
    });
}

criterion_group!(benches, bench_quote_fields, bench_substitute, bench_join_clause);
criterion_main!(benches);
