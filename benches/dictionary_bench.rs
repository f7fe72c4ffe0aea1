use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use script_dictionary::{Dictionary, Key};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn string_key(n: u64) -> Key {
    Key::from(format!("k{:016x}", n))
}

// Alternates kinds so probes cross integer, real and string hashing.
fn mixed_key(n: u64) -> Key {
    match n % 3 {
        0 => Key::Integer(n as i64),
        1 => Key::real(f64::from_bits(n >> 12 | 0x3ff0_0000_0000_0000)),
        _ => string_key(n),
    }
}

fn bench_set(c: &mut Criterion) {
    let keys: Vec<Key> = lcg(1).take(10_000).map(mixed_key).collect();
    c.bench_function("dictionary_set_10k", |b| {
        b.iter_batched(
            || (Dictionary::<u64>::new(), keys.clone()),
            |(mut d, keys)| {
                for (i, k) in keys.into_iter().enumerate() {
                    d.set(k, i as u64).unwrap();
                }
                black_box(d)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit(c: &mut Criterion) {
    c.bench_function("dictionary_get_hit", |b| {
        let mut d = Dictionary::new();
        let keys: Vec<Key> = lcg(7).take(20_000).map(mixed_key).collect();
        for (i, k) in keys.iter().enumerate() {
            d.set(k.clone(), i as u64).unwrap();
        }
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            black_box(d.get(k).unwrap());
        })
    });
}

fn bench_get_miss(c: &mut Criterion) {
    c.bench_function("dictionary_get_miss", |b| {
        let mut d = Dictionary::new();
        for (i, x) in lcg(11).take(10_000).enumerate() {
            d.set(string_key(x), i as u64).unwrap();
        }
        let mut miss = lcg(0xdead_beef).map(string_key);
        b.iter(|| {
            let k = miss.next().unwrap();
            black_box(d.has(&k).unwrap());
        })
    });
}

fn bench_remove_reinsert(c: &mut Criterion) {
    c.bench_function("dictionary_remove_reinsert", |b| {
        let mut d = Dictionary::new();
        let keys: Vec<Key> = lcg(13).take(10_000).map(mixed_key).collect();
        for (i, k) in keys.iter().enumerate() {
            d.set(k.clone(), i as u64).unwrap();
        }
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            if let Some(v) = d.remove(k).unwrap() {
                d.set(k.clone(), v).unwrap();
            }
        })
    });
}

fn config() -> Criterion {
    Criterion::default().measurement_time(Duration::from_secs(3))
}

criterion_group! {
    name = benches;
    config = config();
    targets = bench_set, bench_get_hit, bench_get_miss, bench_remove_reinsert
}
criterion_main!(benches);
