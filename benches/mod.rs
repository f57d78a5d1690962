use criterion::{criterion_group, criterion_main};

mod network;

criterion_group!(
    benches,
    network::application::http::response::bench_single_feed,
    network::application::http::response::bench_fragmented_feed,
    network::application::http::response::bench_chunked_feed
);
criterion_main!(benches);
