use std::{
    hint::black_box,
    io::Cursor,
    time::Duration,
};

use criterion::{
    Criterion,
    Throughput,
    criterion_group,
    criterion_main,
};
use image::{
    Rgb,
    RgbImage,
};
use sstvcast::{
    ContainerFormat,
    EncodeOptions,
    ModeSpecification,
    encode,
    write_container,
};

pub fn bench_encoding(c: &mut Criterion) {
    let mode = &ModeSpecification::M2;
    let image = RgbImage::from_fn(mode.width as u32, mode.height as u32, |x, y| {
        Rgb([x as u8, y as u8, (x + y) as u8])
    });
    let options = EncodeOptions::default();

    let mut group = c.benchmark_group("encoding");
    group.measurement_time(Duration::from_secs(20));
    group.sample_size(20);

    let buffer = encode(&image, "m2", &options).expect("encoding failed");
    group.throughput(Throughput::Elements(buffer.len() as u64));

    group.bench_function("martin 2", |b| {
        b.iter(|| {
            black_box(encode(black_box(&image), "m2", &options).expect("encoding failed"));
        })
    });

    group.bench_function("martin 2 to wav", |b| {
        b.iter(|| {
            let mut cursor = Cursor::new(Vec::<u8>::with_capacity(buffer.data_len_bytes() + 44));
            write_container(black_box(&buffer), ContainerFormat::Wav, &mut cursor)
                .expect("writing wav failed");
            black_box(cursor);
        })
    });

    group.finish();
}

criterion_group!(benches, bench_encoding);
criterion_main!(benches);
