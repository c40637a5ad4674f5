use criterion::{criterion_group, criterion_main, Criterion};
use customer_core::{Customer, CustomerRepository};

fn mk_customer(index: usize) -> Customer {
    Customer {
        id: index.to_string(),
        name: format!("Name{index}"),
        surname: "Bench".to_string(),
        email: format!("customer{index}@example.com"),
        birthdate: "1990-01-01".to_string(),
    }
}

fn bench_lookup(c: &mut Criterion) {
    let repository =
        CustomerRepository::from_customers((0..1_000).map(mk_customer).collect::<Vec<_>>());

    c.bench_function("find_by_id_1000_customers", |b| {
        b.iter(|| {
            if repository.find_by_id("500").is_none() {
                panic!("lookup benchmark fixture is missing id 500");
            }
        });
    });
}

fn bench_validate(c: &mut Criterion) {
    let customers = (0..1_000).map(mk_customer).collect::<Vec<_>>();

    c.bench_function("validate_1000_customers", |b| {
        b.iter(|| {
            for customer in &customers {
                if let Err(err) = customer.validate() {
                    panic!("validation benchmark fixture rejected: {err}");
                }
            }
        });
    });
}

criterion_group!(repository_benches, bench_lookup, bench_validate);
criterion_main!(repository_benches);
