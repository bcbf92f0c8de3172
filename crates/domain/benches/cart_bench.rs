use common::ItemId;
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{Cart, CartProduct, Money, TaxRate};

fn product(id: i64) -> CartProduct {
    CartProduct::new(ItemId::new(id), format!("Item {id}"), Money::from_cents(1000 + id))
        .unwrap()
        .with_tax_rate(TaxRate::from_percent(5).unwrap())
}

fn filled_cart(lines: i64) -> Cart {
    let mut cart = Cart::new();
    for id in 0..lines {
        cart.add(product(id));
    }
    cart
}

fn bench_add(c: &mut Criterion) {
    c.bench_function("cart/add_50_lines", |b| {
        b.iter(|| filled_cart(50));
    });
}

fn bench_increment(c: &mut Criterion) {
    let mut cart = filled_cart(50);
    let last = product(49);

    c.bench_function("cart/increment_last_line", |b| {
        b.iter(|| cart.add(last.clone()));
    });
}

fn bench_totals(c: &mut Criterion) {
    let cart = filled_cart(50);

    c.bench_function("cart/grand_total_50_lines", |b| {
        b.iter(|| cart.grand_total());
    });
}

fn bench_set_quantity(c: &mut Criterion) {
    let mut cart = filled_cart(50);
    let mut quantity = 1;

    c.bench_function("cart/set_quantity", |b| {
        b.iter(|| {
            quantity = quantity % 9 + 1;
            cart.set_quantity(ItemId::new(25), quantity)
        });
    });
}

criterion_group!(
    benches,
    bench_add,
    bench_increment,
    bench_totals,
    bench_set_quantity
);
criterion_main!(benches);
