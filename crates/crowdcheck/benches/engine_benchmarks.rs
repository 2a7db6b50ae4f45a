//! Engine and filter performance benchmarks.
//!
//! Measures the raw-data suite, single expectations, and the period filter on
//! synthetic campaign tables of increasing size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use crowdcheck::suites;
use crowdcheck::{CampaignFilter, CampaignRules, Dataset, ExpectationEngine, Parser};

const CATEGORIES: &[&str] = &["art", "games", "music", "technology", "food", "comics"];
const COUNTRIES: &[&str] = &["US", "US", "US", "CA", "GB"];

/// Build a campaign table with some duplicate ids and some nulls.
fn campaign_table(rows: usize) -> Dataset {
    let mut text = String::from(
        "id,name,currency,main_category,launched_at,deadline,goal_usd,country,usd_pledged,status\n",
    );

    for i in 0..rows {
        let id = if i % 10 == 0 { i / 2 } else { i };
        let country = COUNTRIES[i % COUNTRIES.len()];
        let currency = if country == "US" { "USD" } else { "CAD" };
        let month = 1 + (i % 12);
        let pledged = if i % 25 == 0 { String::new() } else { (i * 7).to_string() };
        let status = if i % 3 == 0 { "failed" } else { "successful" };

        text.push_str(&format!(
            "{id},Campaign {i},{currency},{category},2017-{month:02}-01 10:00:00,2017-{month:02}-28 10:00:00,1000,{country},{pledged},{status}\n",
            category = CATEGORIES[i % CATEGORIES.len()],
        ));
    }

    Parser::new().parse_str(&text).expect("synthetic table parses")
}

/// Benchmark the full raw-data suite.
fn bench_raw_suite(c: &mut Criterion) {
    let mut group = c.benchmark_group("raw_suite");
    let rules = CampaignRules::default();
    let expectations = suites::raw_expectations(&rules);

    for rows in [1_000, 10_000, 50_000] {
        let table = campaign_table(rows);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &table, |b, table| {
            b.iter(|| {
                black_box(
                    ExpectationEngine::new(table)
                        .validate("raw_data", &expectations)
                        .unwrap(),
                )
            })
        });
    }

    group.finish();
}

/// Benchmark individual expectation kinds.
fn bench_expectations(c: &mut Criterion) {
    let mut group = c.benchmark_group("expectations");
    let table = campaign_table(10_000);
    let engine = ExpectationEngine::new(&table);

    group.bench_function("values_not_null", |b| {
        b.iter(|| black_box(engine.values_not_null("usd_pledged").unwrap()))
    });

    group.bench_function("values_in_set", |b| {
        b.iter(|| black_box(engine.values_in_set("country", &["US"]).unwrap()))
    });

    group.bench_function("values_unique", |b| {
        b.iter(|| black_box(engine.values_unique("id").unwrap()))
    });

    group.bench_function("strftime_format", |b| {
        b.iter(|| {
            black_box(
                engine
                    .values_match_strftime_format("launched_at", "%Y-%m-%d %H:%M:%S")
                    .unwrap(),
            )
        })
    });

    group.finish();
}

/// Benchmark the campaign filter and period deduplication.
fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("campaign_filter");
    let rules = CampaignRules::default();
    let filter = CampaignFilter::new(&rules);

    for rows in [1_000, 10_000, 50_000] {
        let table = campaign_table(rows);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &table, |b, table| {
            b.iter(|| black_box(filter.apply(table).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_raw_suite, bench_expectations, bench_filter);
criterion_main!(benches);
