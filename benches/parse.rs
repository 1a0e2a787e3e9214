use criterion::{Criterion, criterion_group, criterion_main};
use kseq_compat_reader::{ReaderOptions, SeqReader};

fn fastq_data(n: usize) -> Vec<u8> {
    let mut data = String::new();
    for i in 0..n {
        data.push_str(&format!("@r{i} lane:1\nACGTACGTACGTACGT\nACGTACGT\n+\n################\n########\n"));
    }
    data.into_bytes()
}

fn bench_parse(c: &mut Criterion) {
    let data = fastq_data(2000);
    for reuse in [false, true] {
        let name = if reuse { "parse_2000_multiline_reuse" } else { "parse_2000_multiline_owned" };
        c.bench_function(name, |b| {
            b.iter(|| {
                let fq = SeqReader::with_options(
                    &data[..],
                    ReaderOptions {
                        reuse_buffers: reuse,
                        ..ReaderOptions::default()
                    },
                );
                let mut n = 0usize;
                for rec in fq {
                    n += rec.unwrap().len();
                }
                n
            })
        });
    }
    c.bench_function("parse_2000_multiline_borrowed", |b| {
        b.iter(|| {
            let mut fq = SeqReader::new(&data[..]);
            let mut n = 0usize;
            while let Some(rec) = fq.read_record_ref().unwrap() {
                n += rec.len();
            }
            n
        })
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
