use criterion::{black_box, criterion_group, criterion_main, Criterion};
use psyscreen::{encode, EncodedVector, FeatureSchema, PredictionContext, Predictor, PredictorError, Question, RawAnswer, QUESTION_TABLE};

struct Fixed;

impl Predictor for Fixed {
    fn predict(&self, _vector: &EncodedVector) -> Result<i64, PredictorError> {
        Ok(2)
    }
}

fn schema_with_padding(extra: usize) -> FeatureSchema {
    let mut features: Vec<String> = QUESTION_TABLE.iter().map(|m| m.feature.to_string()).collect();
    features.extend((0..extra).map(|i| format!("Unused Feature_{}", i)));
    FeatureSchema::new(features).unwrap()
}

fn bench_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("Encoding");
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    let answers = RawAnswer::with_defaults().with_answer(Question::Race, "NON-WHITE");

    // Form columns only
    let small = schema_with_padding(0);
    group.bench_function("form_columns", |b| b.iter(|| {
        encode(black_box(&answers), black_box(&small))
    }));

    // Wide schema where most columns are unmapped
    let wide = schema_with_padding(200);
    group.bench_function("wide_schema", |b| b.iter(|| {
        encode(black_box(&answers), black_box(&wide))
    }));

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let context = PredictionContext::builder()
        .with_schema(schema_with_padding(40))
        .with_predictor(Fixed)
        .build()
        .unwrap();
    let answers = RawAnswer::with_defaults();

    c.bench_function("predict_with_stub_model", |b| b.iter(|| {
        context.predict(black_box(&answers)).unwrap()
    }));
}

criterion_group!(benches, bench_encoding, bench_pipeline);
criterion_main!(benches);
