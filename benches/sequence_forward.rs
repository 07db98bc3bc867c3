//! Forward-pass and assembly benchmarks for sequences built by the helpers

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndarray::{Array, ArrayD};
use seqnet::builders::{concat_sequences, conv_sequence, linear_sequence, BlockOptions, DEFAULT};
use seqnet::layers::{FlattenLayer, Module};
use seqnet::models::{Vgg, VggDepth};
use seqnet::Sequential;

fn small_cnn() -> Sequential {
    let options = BlockOptions::default();
    concat_sequences(vec![
        conv_sequence(&[(3, 16, DEFAULT, DEFAULT, 1), (16, 16, DEFAULT, DEFAULT, 1)], Some((2, DEFAULT, DEFAULT)), &options)
            .expect("valid conv block"),
        conv_sequence(&[(16, 32, DEFAULT, DEFAULT, 1)], Some((2, DEFAULT, DEFAULT)), &options)
            .expect("valid conv block"),
        Sequential::new().add(FlattenLayer::new()),
        linear_sequence(&[(32 * 8 * 8, 64, -1.0)], &options).expect("valid linear block"),
        linear_sequence(&[(64, 10, 0.0)], &options.clone().without_activation()).expect("valid head"),
    ])
}

fn bench_small_cnn_forward(c: &mut Criterion) {
    let mut model = small_cnn();
    model.eval();
    let input: ArrayD<f32> = Array::from_elem((8, 3, 32, 32), 0.5).into_dyn();

    c.bench_function("small_cnn_forward_batch8", |b| {
        b.iter(|| model.forward(black_box(input.clone())).expect("forward pass"))
    });
}

fn bench_vgg11_forward(c: &mut Criterion) {
    let mut model = Vgg::new(VggDepth::Vgg11)
        .input_size(32)
        .hidden_features(256)
        .num_classes(10)
        .build()
        .expect("valid VGG configuration");
    model.eval();
    let input: ArrayD<f32> = Array::from_elem((1, 3, 32, 32), 0.5).into_dyn();

    c.bench_function("vgg11_32px_forward", |b| {
        b.iter(|| model.forward(black_box(input.clone())).expect("forward pass"))
    });
}

fn bench_assembly(c: &mut Criterion) {
    c.bench_function("assemble_small_cnn", |b| b.iter(|| black_box(small_cnn())));
}

criterion_group!(benches, bench_small_cnn_forward, bench_vgg11_forward, bench_assembly);
criterion_main!(benches);
