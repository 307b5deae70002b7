use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveTime;
use ulid::Ulid;

use officehours::engine::{Engine, EngineError};
use officehours::model::{Actor, IntervalDraft, Role};
use officehours::notify::NotifyHub;

const STUDENTS: usize = 2_000;

fn percentile(sorted: &[Duration], p: f64) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let idx = ((sorted.len() as f64) * p / 100.0) as usize;
    sorted[idx.min(sorted.len() - 1)]
}

fn print_latency(label: &str, latencies: &mut [Duration]) {
    if latencies.is_empty() {
        println!("  {label}: no samples");
        return;
    }
    latencies.sort();
    let total: Duration = latencies.iter().sum();
    let avg = total / latencies.len() as u32;
    println!("  {label}:");
    println!(
        "    n={}, avg={:.3}ms, p50={:.3}ms, p95={:.3}ms, p99={:.3}ms, max={:.3}ms",
        latencies.len(),
        avg.as_secs_f64() * 1000.0,
        percentile(latencies, 50.0).as_secs_f64() * 1000.0,
        percentile(latencies, 95.0).as_secs_f64() * 1000.0,
        percentile(latencies, 99.0).as_secs_f64() * 1000.0,
        latencies[latencies.len() - 1].as_secs_f64() * 1000.0,
    );
}

struct Slot {
    id: Ulid,
    capacity: u32,
}

async fn setup(engine: &Engine) -> Vec<Slot> {
    let capacities = [1, 1, 1, 5, 5, 5, 10, 10, 30, 30];
    let days = ["monday", "tuesday", "wednesday", "thursday", "friday"];
    let mut slots = Vec::new();

    for (i, &cap) in capacities.iter().enumerate() {
        let teacher = Actor::new(Ulid::new(), Role::Teacher);
        let start = 8 + (i as u32 % 8);
        let draft = IntervalDraft {
            day: days[i % days.len()].into(),
            start: NaiveTime::from_hms_opt(start, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(start + 1, 0, 0).unwrap(),
            capacity: cap,
        };
        let id = engine.create_interval(teacher, draft).await.unwrap();
        slots.push(Slot { id, capacity: cap });
    }

    println!("  created {} intervals", slots.len());
    slots
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    println!("reservation contention: {STUDENTS} students");
    let engine = Arc::new(Engine::new(Arc::new(NotifyHub::new())));
    let slots = setup(&engine).await;

    let started = Instant::now();
    let mut handles = Vec::with_capacity(STUDENTS);
    for n in 0..STUDENTS {
        let engine = engine.clone();
        let target = slots[n % slots.len()].id;
        handles.push(tokio::spawn(async move {
            let student = Actor::new(Ulid::new(), Role::Student);
            let t0 = Instant::now();
            let result = engine.reserve(student, target).await;
            (t0.elapsed(), result)
        }));
    }

    let mut ok_latencies = Vec::new();
    let mut full_latencies = Vec::new();
    for h in handles {
        let (elapsed, result) = h.await.unwrap();
        match result {
            Ok(()) => ok_latencies.push(elapsed),
            Err(EngineError::CapacityExceeded(_)) => full_latencies.push(elapsed),
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    let wall = started.elapsed();

    let seats: u32 = slots.iter().map(|s| s.capacity).sum();
    assert_eq!(ok_latencies.len() as u32, seats, "oversold or undersold");
    for slot in &slots {
        let info = engine.get_interval(&slot.id).await.unwrap();
        assert_eq!(info.reserved, slot.capacity);
    }

    println!("  wall: {:.2}ms", wall.as_secs_f64() * 1000.0);
    print_latency("reserved", &mut ok_latencies);
    print_latency("rejected (full)", &mut full_latencies);
}
