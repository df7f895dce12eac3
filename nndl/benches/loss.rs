use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use nndl::linear_algebra::{Matrix, Value};
use nndl::{SoftmaxClassifier, TwoLayerNet};

criterion_main!(benches);
criterion_group!(
    benches,
    softmax_loss_and_grad,
    softmax_fast_loss_and_grad,
    two_layer_loss
);

const BATCH_SIZE: usize = 200;
const FEATURES: usize = 3073;
const CLASSES: usize = 10;

fn batch(rng: &mut StdRng) -> (Matrix, Vec<usize>) {
    let mut inputs = Matrix::zeros(BATCH_SIZE, FEATURES);
    inputs
        .values_mut()
        .for_each(|x| *x = rng.sample::<Value, _>(StandardNormal));
    let labels = (0..BATCH_SIZE).map(|_| rng.gen_range(0..CLASSES)).collect();
    (inputs, labels)
}

fn bench_group(c: &mut Criterion, name: &str, mut f: impl FnMut() -> Value) {
    c.benchmark_group("benches")
        .measurement_time(Duration::from_secs(10))
        .sample_size(50)
        .bench_function(name, |b| b.iter(&mut f));
}

pub fn softmax_loss_and_grad(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let classifier = SoftmaxClassifier::new(CLASSES, FEATURES, &mut rng);
    let (inputs, labels) = batch(&mut rng);

    bench_group(c, "softmax_loss_and_grad", || {
        classifier
            .loss_and_grad(black_box(&inputs), black_box(&labels))
            .unwrap()
            .0
    });
}

pub fn softmax_fast_loss_and_grad(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let classifier = SoftmaxClassifier::new(CLASSES, FEATURES, &mut rng);
    let (inputs, labels) = batch(&mut rng);

    bench_group(c, "softmax_fast_loss_and_grad", || {
        classifier
            .fast_loss_and_grad(black_box(&inputs), black_box(&labels))
            .unwrap()
            .0
    });
}

pub fn two_layer_loss(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let net = TwoLayerNet::new(FEATURES, 50, CLASSES, 1e-4, &mut rng);
    let (inputs, labels) = batch(&mut rng);

    bench_group(c, "two_layer_loss", || {
        net.loss(black_box(&inputs), black_box(&labels), 1e-5)
            .unwrap()
            .0
    });
}
