use criterion::{black_box, criterion_group, criterion_main, Criterion};
use seedvault::FieldElement;

fn bench_field(c: &mut Criterion) {
    let mut a_bytes = [0u8; 32];
    let mut b_bytes = [0u8; 32];
    for i in 0..32 {
        a_bytes[i] = (i as u8).wrapping_mul(73).wrapping_add(11);
        b_bytes[i] = (i as u8).wrapping_mul(29).wrapping_add(3);
    }
    let a = FieldElement::from_bytes(a_bytes).normalize();
    let b = FieldElement::from_bytes(b_bytes).normalize();

    c.bench_function("field_mul", |bench| {
        bench.iter(|| black_box(a).mul(&black_box(b)));
    });

    c.bench_function("field_invert", |bench| {
        bench.iter(|| black_box(a).invert());
    });

    c.bench_function("field_add_sub", |bench| {
        bench.iter(|| black_box(a).add(&b).sub(&black_box(b)));
    });
}

criterion_group!(benches, bench_field);
criterion_main!(benches);
