use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use kmer_counter::{
    builder::KmerCounter,
    counter::{CountTable, Counter},
    fixture::SequenceGenerator,
    kmer::{KmerLength, Kmers, Strand},
    pipeline::CountMode,
};

fn bench_kmers(c: &mut Criterion) {
    let mut group = c.benchmark_group("Kmers");
    let mut seq = SequenceGenerator::new(1).sequence(10_000);
    // one ambiguous base every 500
    for i in (250..seq.len()).step_by(500) {
        seq[i] = b'N';
    }
    group.throughput(Throughput::Bytes(seq.len() as u64));

    for k in [5, 11, 21, 31] {
        let k_len = KmerLength::new(k).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(k), &seq, |b, seq| {
            b.iter(|| Kmers::new(black_box(seq), k_len).count())
        });
    }

    group.finish();
}

fn bench_tally(c: &mut Criterion) {
    let mut group = c.benchmark_group("Counter::tally");
    let seq = SequenceGenerator::new(2).sequence(10_000);
    group.throughput(Throughput::Bytes(seq.len() as u64));

    for strand in [Strand::Forward, Strand::Canonical, Strand::Both] {
        let counter = Counter::new(KmerLength::new(11).unwrap()).with_strand(strand);
        group.bench_with_input(BenchmarkId::from_parameter(strand), &seq, |b, seq| {
            b.iter(|| {
                let mut table = CountTable::new();
                counter.tally(black_box(seq), &mut table).unwrap();
                black_box(table)
            })
        });
    }

    group.finish();
}

fn bench_run_fasta(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_fasta");

    let mut fasta = Vec::new();
    SequenceGenerator::new(3)
        .write_fasta(&mut fasta, 500, 320)
        .unwrap();
    group.throughput(Throughput::Bytes(fasta.len() as u64));

    for threads in [1, 4] {
        let counter = KmerCounter::new().k(11).unwrap().threads(threads);
        group.bench_with_input(
            BenchmarkId::new("per_record", threads),
            &fasta,
            |b, fasta| {
                b.iter(|| {
                    let mut out = Vec::with_capacity(fasta.len() * 4);
                    counter.run_fasta(black_box(&fasta[..]), &mut out).unwrap();
                    out
                })
            },
        );
    }

    let merged = KmerCounter::new().k(11).unwrap().mode(CountMode::Merge);
    group.bench_with_input(BenchmarkId::new("merge", 1), &fasta, |b, fasta| {
        b.iter(|| {
            let mut out = Vec::new();
            merged.run_fasta(black_box(&fasta[..]), &mut out).unwrap();
            out
        })
    });

    group.finish();
}

criterion_group!(benches, bench_kmers, bench_tally, bench_run_fasta);

criterion_main!(benches);
