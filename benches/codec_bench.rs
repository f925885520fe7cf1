use criterion::{black_box, criterion_group, criterion_main, Criterion};

use stratum::{encode, Field, Layout, Value, View};

fn record_layout() -> Layout {
    let bytes = || Layout::fix_vec(Layout::Fixed(1));
    Layout::table(vec![
        Field::new("id", Layout::Fixed(20)),
        Field::new(
            "header",
            Layout::fixed_struct(vec![
                Field::new("tag", Layout::Fixed(1)),
                Field::new("stamp", Layout::Fixed(8)),
            ]),
        ),
        Field::new("body", bytes()),
        Field::new("chunks", Layout::dyn_vec(bytes())),
        Field::new("note", Layout::option(bytes())),
    ])
}

fn record_value() -> Value {
    Value::Seq(vec![
        Value::Bytes(vec![0xaa; 20]),
        Value::Seq(vec![Value::from(3u8), Value::from(1_691_000_000u64)]),
        Value::from(b"a moderately sized payload body".as_slice()),
        Value::Seq(vec![
            Value::from(b"chunk-one".as_slice()),
            Value::from(b"".as_slice()),
            Value::from(b"chunk-three".as_slice()),
        ]),
        Value::some(Value::from(b"trailing note".as_slice())),
    ])
}

fn encode_bench(c: &mut Criterion) {
    let layout = record_layout();
    let value = record_value();
    c.bench_function("encode_record", |b| {
        b.iter(|| black_box(encode(&layout, &value).unwrap()))
    });
}

fn decode_checked_bench(c: &mut Criterion) {
    let layout = record_layout();
    let buf = encode(&layout, &record_value()).unwrap();
    c.bench_function("decode_checked_record", |b| {
        b.iter(|| black_box(View::decode_checked(&layout, &buf, true).unwrap().raw()))
    });
}

fn field_access_bench(c: &mut Criterion) {
    let layout = record_layout();
    let buf = encode(&layout, &record_value()).unwrap();
    let view = View::decode_unchecked(&layout, &buf);
    c.bench_function("lazy_field_access", |b| {
        b.iter(|| black_box(view.field("chunks").unwrap().len().unwrap()))
    });
}

criterion_group! {
    name = codec_benches;
    config = Criterion::default();
    targets = encode_bench, decode_checked_bench, field_access_bench
}

criterion_main!(codec_benches);
