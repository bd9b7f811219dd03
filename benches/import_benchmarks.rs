//! Benchmarks for the spreadsheet import pipeline.
//!
//! - Parsing CSV text of growing size
//! - Header assignment and row mapping
//! - Resolving contact names against a contact list

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use crm_mcp_server::matching::ContactMatcher;
use crm_mcp_server::models::Contact;
use crm_mcp_server::spreadsheet::{apply_mapping, auto_map, read_table_bytes, ImportEntity};

const FIRST_NAMES: &[&str] = &["Ana", "Bruno", "Carla", "Diego", "Elena", "Fabio", "Gina"];
const LAST_NAMES: &[&str] = &["Silva", "Souza", "Costa", "Pereira", "Lima", "Alves"];

fn person(i: usize) -> String {
    format!(
        "{} {}",
        FIRST_NAMES[i % FIRST_NAMES.len()],
        LAST_NAMES[(i / FIRST_NAMES.len()) % LAST_NAMES.len()]
    )
}

fn contacts_csv(rows: usize) -> Vec<u8> {
    let mut csv = String::from("Full Name,Phone Number,E-mail,Company,Tags\n");
    for i in 0..rows {
        csv.push_str(&format!(
            "{},+55119{:08},user{}@example.com,Company {},\"client, tier{}\"\n",
            person(i),
            i,
            i,
            i % 40,
            i % 3
        ));
    }
    csv.into_bytes()
}

fn contacts(count: usize) -> Vec<Contact> {
    (0..count)
        .map(|i| Contact {
            id: format!("c{}", i),
            user_id: "u1".to_string(),
            name: format!("{} {}", person(i), i),
            email: None,
            phone: i.to_string(),
            whatsapp: None,
            company: None,
            notes: None,
            tags: Vec::new(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        })
        .collect()
}

fn bench_read_csv(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_csv");
    for rows in [100, 1_000, 10_000] {
        let bytes = contacts_csv(rows);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &bytes, |b, bytes| {
            b.iter(|| read_table_bytes("contacts.csv", black_box(bytes)).unwrap());
        });
    }
    group.finish();
}

fn bench_map_rows(c: &mut Criterion) {
    let columns = ImportEntity::Contacts.profile().columns;
    let data = read_table_bytes("contacts.csv", &contacts_csv(1_000)).unwrap();

    c.bench_function("auto_map", |b| {
        b.iter(|| auto_map(black_box(&data.headers), columns));
    });

    let assigned = auto_map(&data.headers, columns);
    c.bench_function("apply_mapping_1000_rows", |b| {
        b.iter(|| apply_mapping(black_box(&data.rows), columns, &assigned));
    });
}

fn bench_resolve_contact(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_contact");
    for count in [100, 1_000] {
        let contacts = contacts(count);
        let mut matcher = ContactMatcher::new();
        group.bench_with_input(BenchmarkId::from_parameter(count), &contacts, |b, contacts| {
            b.iter(|| matcher.resolve(black_box("carla costa"), None, contacts, 60));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_read_csv, bench_map_rows, bench_resolve_contact);
criterion_main!(benches);
