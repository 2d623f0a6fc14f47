use chrono::NaiveTime;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fundbot::core::message::{ClockFormat, Message};
use fundbot::core::transcript::Transcript;
use fundbot::ui::theme::{Theme, ThemeMode};
use fundbot::utils::scroll::{build_transcript_lines, wrapped_line_count};

fn make_transcript(n_pairs: usize, base: &str) -> Transcript {
    let time = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default();
    let mut transcript = Transcript::new();
    for _ in 0..n_pairs {
        transcript.push(Message::at("You", base, false, time));
        transcript.push(Message::at("AI FundBot", base, true, time));
    }
    transcript
}

fn bench_transcript_render(c: &mut Criterion) {
    let base = "With a monthly salary of ₹50,000 and fixed expenses around ₹30,000, keep six months of expenses, roughly ₹1,80,000, in a liquid emergency fund";
    let theme = Theme::for_mode(ThemeMode::Dark);

    for &pairs in &[100usize, 400usize] {
        let transcript = make_transcript(pairs, base);
        let built = build_transcript_lines(
            &transcript,
            Some("AI FundBot is calculating..."),
            &theme,
            ClockFormat::TwentyFourHour,
        );

        let mut group = c.benchmark_group(format!("transcript_pairs{pairs}"));
        group.throughput(Throughput::Elements(built.len() as u64));

        group.bench_function("build_lines", |b| {
            b.iter(|| {
                build_transcript_lines(
                    &transcript,
                    Some("AI FundBot is calculating..."),
                    &theme,
                    ClockFormat::TwentyFourHour,
                )
            })
        });

        for &width in &[80u16, 120u16] {
            group.bench_with_input(BenchmarkId::new("wrapped_count", width), &width, |b, &w| {
                b.iter(|| wrapped_line_count(&built, w))
            });
        }
        group.finish();
    }
}

criterion_group!(benches, bench_transcript_render);
criterion_main!(benches);
