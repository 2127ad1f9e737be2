use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use flatseq_io::{parse_embl, write_embl, ReaderConfig, RecordStream};
use std::io::Write;

fn random_dna(len: usize, state: &mut u64) -> String {
    let bases = ['a', 'c', 'g', 't'];
    (0..len)
        .map(|_| {
            *state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            bases[((*state >> 33) % 4) as usize]
        })
        .collect()
}

fn embl_entry(i: usize, seq_len: usize, state: &mut u64) -> String {
    let dna = random_dna(seq_len, state);
    let mut out = String::new();
    out.push_str(&format!("ID   E{i:05}; SV 1; linear; genomic DNA; STD; PRO; {seq_len} BP.\n"));
    out.push_str("XX\n");
    out.push_str(&format!("AC   E{i:05};\n"));
    out.push_str("XX\n");
    out.push_str("DE   Synthetic benchmark entry with a short description.\n");
    out.push_str("XX\n");
    out.push_str("FH   Key             Location/Qualifiers\n");
    out.push_str("FH\n");
    out.push_str(&format!("FT   source          1..{seq_len}\n"));
    out.push_str("FT                   /organism=\"Escherichia coli\"\n");
    out.push_str(&format!("FT   CDS             join(1..100,200..{seq_len})\n"));
    out.push_str("FT                   /note=\"a note long enough that it has to be wrapped\n");
    out.push_str("FT                   over two lines\"\n");
    out.push_str("XX\n");
    out.push_str(&format!("SQ   Sequence {seq_len} BP;\n"));
    for (n, chunk) in dna.as_bytes().chunks(60).enumerate() {
        let groups: Vec<&str> = chunk
            .chunks(10)
            .map(|g| std::str::from_utf8(g).unwrap())
            .collect();
        let count = (n * 60 + chunk.len()).to_string();
        out.push_str(&format!("     {:<65}{:>10}\n", groups.join(" "), count));
    }
    out.push_str("//\n");
    out
}

fn make_embl(n_records: usize, seq_len: usize) -> String {
    let mut state: u64 = 42;
    (0..n_records).map(|i| embl_entry(i, seq_len, &mut state)).collect()
}

fn bench_embl_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("embl_parse");

    for &(n, len) in &[(100, 1000), (1000, 1000), (10, 100_000)] {
        let text = make_embl(n, len);
        group.bench_with_input(
            BenchmarkId::new("records", format!("{n}x{len}bp")),
            &text,
            |b, text| {
                b.iter(|| {
                    RecordStream::new(black_box(text.as_bytes()), ReaderConfig::embl())
                        .filter_map(Result::ok)
                        .count()
                })
            },
        );
    }

    let text = make_embl(1000, 1000);
    group.bench_function("skip_sequence", |b| {
        let config = ReaderConfig::embl().with_sequence(false);
        b.iter(|| {
            RecordStream::new(black_box(text.as_bytes()), config)
                .filter_map(Result::ok)
                .count()
        })
    });

    group.finish();
}

fn bench_embl_gzip(c: &mut Criterion) {
    let text = make_embl(1000, 1000);
    let mut f = tempfile::NamedTempFile::new().unwrap();
    {
        let mut gz = flate2::write::GzEncoder::new(&mut f, flate2::Compression::default());
        gz.write_all(text.as_bytes()).unwrap();
        gz.finish().unwrap();
    }
    f.flush().unwrap();

    c.bench_function("embl_parse_gzip_1000x1000bp", |b| {
        b.iter(|| parse_embl(black_box(f.path())).unwrap().len())
    });
}

fn bench_embl_write(c: &mut Criterion) {
    let text = make_embl(1000, 1000);
    let records: Vec<_> = RecordStream::new(text.as_bytes(), ReaderConfig::embl())
        .map(|r| r.unwrap().0)
        .collect();

    c.bench_function("embl_write_1000x1000bp", |b| {
        b.iter(|| write_embl(black_box(&records)).unwrap().len())
    });
}

criterion_group!(benches, bench_embl_parse, bench_embl_gzip, bench_embl_write);
criterion_main!(benches);
