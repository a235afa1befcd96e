//! Criterion benchmarks for the u-invigil operator family.
//!
//! Uses a synthetic roster and calendar to measure operator overhead on
//! a realistically sized instance.

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use u_invigil::construct::{fill_slots, ScoringMode};
use u_invigil::context::{DomainContext, RunContext};
use u_invigil::lns::{LnsConfig, LnsRunner};
use u_invigil::models::{
    ExamCalendar, Hall, HallTier, Roster, Schedule, SchedulerConfig, SlotKind, SlotSpec, Subject,
};
use u_invigil::placement::place_subjects;
use u_invigil::swap::hill_climb;
use u_invigil::tabu::{TabuConfig, TabuRunner};

fn synthetic_problem() -> (Roster, ExamCalendar, SchedulerConfig) {
    let mut roster = Roster {
        professors: (0..24).map(|i| format!("P{i:02}")).collect(),
        subjects: (0..12)
            .map(|i| Subject::new(format!("Subject{i}"), format!("L{}", i % 3 + 1)))
            .collect(),
        halls: vec![
            Hall::new("Amphitheater", HallTier::Large),
            Hall::new("Room A", HallTier::Medium),
            Hall::new("Room B", HallTier::Small),
        ],
        ..Default::default()
    };
    for level in ["L1", "L2", "L3"] {
        roster
            .level_halls
            .insert(level.into(), vec!["Amphitheater".into()]);
    }

    let calendar = ExamCalendar::new(
        (1..=4)
            .map(|d| {
                (
                    NaiveDate::from_ymd_opt(2026, 6, d).unwrap(),
                    vec![
                        SlotSpec::new(
                            "08:00-09:30",
                            SlotKind::Primary,
                            vec!["L1".into(), "L2".into(), "L3".into()],
                        ),
                        SlotSpec::new(
                            "10:00-11:30",
                            SlotKind::Primary,
                            vec!["L1".into(), "L2".into(), "L3".into()],
                        ),
                        SlotSpec::new(
                            "13:00-14:30",
                            SlotKind::Reserve,
                            vec!["L1".into(), "L2".into(), "L3".into()],
                        ),
                    ],
                )
            })
            .collect(),
    );

    let config = SchedulerConfig {
        seed: Some(42),
        max_large_hall_shifts: None,
        ..Default::default()
    };
    (roster, calendar, config)
}

fn constructed_schedule(
    roster: &Roster,
    calendar: &ExamCalendar,
    config: &SchedulerConfig,
) -> Schedule {
    let mut rng = StdRng::seed_from_u64(42);
    let (mut schedule, _) = place_subjects(roster, calendar, config, &mut rng);
    let domain = DomainContext::new(roster, calendar, config);
    let mut ledger = domain.ledger(&schedule);
    let duties = schedule.shortage_duties();
    fill_slots(
        &mut schedule,
        &duties,
        &mut ledger,
        &domain,
        ScoringMode::WeightedWorkload,
        &mut rng,
    );
    schedule
}

fn bench_construction(c: &mut Criterion) {
    let (roster, calendar, config) = synthetic_problem();

    c.bench_function("construct/greedy_fill", |b| {
        b.iter(|| black_box(constructed_schedule(&roster, &calendar, &config)))
    });
}

fn bench_swap(c: &mut Criterion) {
    let (roster, calendar, config) = synthetic_problem();
    let schedule = constructed_schedule(&roster, &calendar, &config);
    let domain = DomainContext::new(&roster, &calendar, &config);

    c.bench_function("swap/hill_climb_50", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(7);
            black_box(hill_climb(schedule.clone(), &domain, 50, &mut rng))
        })
    });
}

fn bench_tabu(c: &mut Criterion) {
    let (roster, calendar, config) = synthetic_problem();
    let schedule = constructed_schedule(&roster, &calendar, &config);
    let domain = DomainContext::new(&roster, &calendar, &config);
    let tabu = TabuConfig::default()
        .with_max_iterations(10)
        .with_neighborhood_size(20)
        .with_seed(7);

    c.bench_function("tabu/10_iterations", |b| {
        b.iter(|| {
            black_box(TabuRunner::run(
                schedule.clone(),
                &domain,
                &tabu,
                &RunContext::detached(),
            ))
        })
    });
}

fn bench_lns(c: &mut Criterion) {
    let (roster, calendar, config) = synthetic_problem();
    let schedule = constructed_schedule(&roster, &calendar, &config);
    let domain = DomainContext::new(&roster, &calendar, &config);
    let lns = LnsConfig::default().with_iterations(10).with_seed(7);

    c.bench_function("lns/10_iterations", |b| {
        b.iter(|| {
            black_box(LnsRunner::run(
                schedule.clone(),
                &domain,
                &lns,
                &RunContext::detached(),
            ))
        })
    });
}

criterion_group!(
    benches,
    bench_construction,
    bench_swap,
    bench_tabu,
    bench_lns
);
criterion_main!(benches);
