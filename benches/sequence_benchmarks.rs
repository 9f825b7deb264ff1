use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use hiit_timer::audio::{Tone, ToneVoice};
use hiit_timer::{HiitConfig, PlaybackMachine, Routine, SequenceCache, compile};

fn routine_with_rounds(rounds: u32) -> Routine {
    Routine {
        hiit: HiitConfig {
            rounds,
            ..HiitConfig::default()
        },
        ..Routine::default()
    }
}

/// Benchmark compiling routines of growing size
fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    for rounds in [1u32, 3, 10, 50] {
        let routine = routine_with_rounds(rounds);
        group.bench_with_input(BenchmarkId::from_parameter(rounds), &routine, |b, routine| {
            b.iter(|| black_box(compile(black_box(routine))));
        });
    }
    group.finish();
}

/// Benchmark the cache hit path (runs every UI frame)
fn bench_cache_hit(c: &mut Criterion) {
    let routine = routine_with_rounds(10);
    let mut cache = SequenceCache::new();
    cache.get_or_compile(&routine);

    c.bench_function("cache_hit", |b| {
        b.iter(|| black_box(cache.get_or_compile(black_box(&routine)).len()));
    });
}

/// Benchmark a full countdown through the default routine
fn bench_full_playback(c: &mut Criterion) {
    let machine = PlaybackMachine::from_routine(&Routine::default());

    c.bench_function("full_playback", |b| {
        b.iter(|| {
            let mut machine = machine.clone();
            machine.toggle();
            while machine.is_active() {
                black_box(machine.tick());
            }
        });
    });
}

/// Benchmark tone rendering for one audio buffer
fn bench_tone_voice(c: &mut Criterion) {
    let buffer_size = 512;
    let mut voice = ToneVoice::new(48000.0);

    c.bench_function("tone_voice_buffer", |b| {
        b.iter(|| {
            voice.start(Tone::TRANSITION);
            for _ in 0..buffer_size {
                black_box(voice.next_sample());
            }
        });
    });
}

criterion_group!(
    benches,
    bench_compile,
    bench_cache_hit,
    bench_full_playback,
    bench_tone_voice
);
criterion_main!(benches);
