//! Form validation throughput.
//!
//! Run with: cargo bench -p invoicedesk-invoicing

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use invoicedesk_invoicing::{CreateInvoice, FormData, InvoiceSchema};

fn valid_form() -> FormData {
    FormData::new()
        .with("customer_id", "cust_1")
        .with("amount", "45.00")
        .with("status", "pending")
}

fn invalid_form() -> FormData {
    FormData::new()
        .with("customer_id", "")
        .with("amount", "abc")
        .with("status", "cancelled")
}

fn bench_create_schema(c: &mut Criterion) {
    let valid = valid_form();
    let invalid = invalid_form();

    let mut group = c.benchmark_group("create_invoice_schema");
    group.bench_function("valid", |b| {
        b.iter(|| CreateInvoice::parse(black_box(&valid)))
    });
    group.bench_function("invalid", |b| {
        b.iter(|| CreateInvoice::parse(black_box(&invalid)))
    });
    group.finish();
}

fn bench_full_schema(c: &mut Criterion) {
    let form = valid_form()
        .with("id", "01890a5d-ac96-774b-bcce-b302099a8057")
        .with("date", "2024-03-09");

    c.bench_function("full_invoice_schema", |b| {
        b.iter(|| InvoiceSchema::full().parse(black_box(&form)))
    });
}

criterion_group!(benches, bench_create_schema, bench_full_schema);
criterion_main!(benches);
