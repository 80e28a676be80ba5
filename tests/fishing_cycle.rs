//! End-to-end fishing cycles against a scripted screen and recorded input.
//!
//! Run with: cargo test --test fishing_cycle -- --nocapture

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use image::Rgba;
use rand::rngs::StdRng;
use rand::SeedableRng;

use splash_angler::{
    CaptureBackend, Color, Coordinate, DetectError, DetectResult, FishingConfig, FishingState,
    FishingStateMachine, InputBackend, ManualClock, MouseButton, PixelBuffer, TickOutcome,
};

const SCREEN: (u32, u32) = (1920, 1080);
const FRAME_COST: Duration = Duration::from_millis(120);
const WATER: Rgba<u8> = Rgba([12, 40, 70, 255]);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Move(i32, i32),
    Down(String),
    Up(String),
    Click(MouseButton),
    Tap(String),
}

/// Input backend that stamps every event with the clock time it happened at
struct TimedRecorder {
    clock: Arc<ManualClock>,
    events: Vec<(Duration, Event)>,
}

impl TimedRecorder {
    fn push(&mut self, event: Event) {
        self.events.push((self.clock.elapsed(), event));
    }

    fn events(&self) -> Vec<Event> {
        self.events.iter().map(|(_, e)| e.clone()).collect()
    }
}

impl InputBackend for TimedRecorder {
    fn move_cursor(&mut self, x: i32, y: i32) {
        self.push(Event::Move(x, y));
    }
    fn key_down(&mut self, key: &str) {
        self.push(Event::Down(key.to_string()));
    }
    fn key_up(&mut self, key: &str) {
        self.push(Event::Up(key.to_string()));
    }
    fn click(&mut self, button: MouseButton) {
        self.push(Event::Click(button));
    }
    fn tap_key(&mut self, key: &str) {
        self.push(Event::Tap(key.to_string()));
    }
}

/// Plays back frames in order and repeats the final one; optionally fails once drained
struct ScriptedScreen {
    clock: Arc<ManualClock>,
    frames: VecDeque<PixelBuffer>,
    last: Option<PixelBuffer>,
    fail_when_drained: bool,
    captures: usize,
}

impl ScriptedScreen {
    fn new(clock: Arc<ManualClock>, frames: Vec<PixelBuffer>) -> Self {
        Self {
            clock,
            frames: frames.into(),
            last: None,
            fail_when_drained: false,
            captures: 0,
        }
    }
}

impl CaptureBackend for ScriptedScreen {
    fn capture(&mut self) -> DetectResult<PixelBuffer> {
        self.clock.advance(FRAME_COST);
        self.captures += 1;
        match self.frames.pop_front() {
            Some(frame) => {
                self.last = Some(frame.clone());
                Ok(frame)
            }
            None if self.fail_when_drained => Err(DetectError::CaptureUnavailable("monitor unplugged".into())),
            None => self
                .last
                .clone()
                .ok_or_else(|| DetectError::CaptureUnavailable("no frames scripted".into())),
        }
    }
}

fn paint(frame: &mut PixelBuffer, (x, y): (u32, u32), color: Color) {
    frame.put_pixel(x, y, Rgba([color.r, color.g, color.b, 255]));
}

/// Water with an optional feather and a few splash pixels a little left of it
fn frame(feather: Option<(u32, u32)>, splash_pixels: usize) -> PixelBuffer {
    let config = FishingConfig::default();
    let mut frame = PixelBuffer::from_pixel(SCREEN.0, SCREEN.1, WATER);
    if let Some((fx, fy)) = feather {
        paint(&mut frame, (fx, fy), config.marker_color);
        for i in 0..splash_pixels as u32 {
            paint(&mut frame, (fx - 40 + i, fy + 10), config.splash_color);
        }
    }
    frame
}

type Machine = FishingStateMachine<ScriptedScreen, TimedRecorder, Arc<ManualClock>, StdRng>;

fn machine_with(frames: Vec<PixelBuffer>) -> (Machine, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let screen = ScriptedScreen::new(Arc::clone(&clock), frames);
    let input = TimedRecorder { clock: Arc::clone(&clock), events: Vec::new() };
    let machine = FishingStateMachine::new(
        FishingConfig::default(),
        screen,
        input,
        Arc::clone(&clock),
        StdRng::seed_from_u64(42),
    );
    (machine, clock)
}

fn catch_sequence(marker: Coordinate) -> Vec<Event> {
    vec![
        Event::Move(marker.x, marker.y),
        Event::Down("SHIFT".into()),
        Event::Click(MouseButton::Right),
        Event::Up("SHIFT".into()),
        Event::Move(0, 0),
    ]
}

#[test]
fn immediate_bite_and_splash_catch_once_per_cast() {
    let (mut machine, clock) = machine_with(vec![frame(Some((900, 700)), 5)]);
    let marker = Coordinate::new(900, 700);

    let mut outcomes = Vec::new();
    for _ in 0..8 {
        outcomes.push(machine.tick().unwrap());
    }

    let cycle = [
        TickOutcome::Cast,
        TickOutcome::BiteFound { marker },
        TickOutcome::SplashDetected { marker, count: 5 },
        TickOutcome::Caught { marker },
    ];
    assert_eq!(outcomes[..4], cycle);
    assert_eq!(outcomes[4..], cycle);
    assert_eq!(machine.state(), FishingState::Idle);

    let mut expected = vec![Event::Tap("0".into())];
    expected.extend(catch_sequence(marker));
    expected.push(Event::Tap("0".into()));
    expected.extend(catch_sequence(marker));
    assert_eq!(machine.input().events(), expected);

    // one frame for the feather and one for the splash per cycle, no extra polling
    assert_eq!(machine.capture_backend().captures, 4);

    let stats = machine.stats();
    assert_eq!((stats.casts, stats.catches, stats.missed_bites, stats.missed_splashes), (2, 2, 0, 0));

    let sleeps = clock.sleeps();
    assert_eq!(sleeps.len(), 6);
    for pair in sleeps.chunks(3) {
        assert!((150..300).contains(&pair[0].as_millis()));
        assert_eq!(pair[1], Duration::from_millis(200));
        assert_eq!(pair[2], Duration::from_secs(5));
    }
}

#[test]
fn catch_timing_follows_hold_click_release_cooldown() {
    let (mut machine, clock) = machine_with(vec![frame(Some((900, 700)), 3)]);
    for _ in 0..3 {
        machine.tick().unwrap();
    }
    let start = clock.elapsed();
    machine.tick().unwrap();

    let events = &machine.input().events[1..];
    let at = |i: usize| events[i].0 - start;
    let jitter = clock.sleeps()[0];

    assert_eq!(at(0), Duration::ZERO); // move
    assert_eq!(at(1), Duration::ZERO); // modifier down
    assert_eq!(at(2), jitter); // click
    assert_eq!(at(3), jitter + Duration::from_millis(200)); // modifier up
    assert_eq!(at(4), jitter + Duration::from_millis(5200)); // pointer reset
}

#[test]
fn late_feather_and_splash_are_picked_up_within_timeouts() {
    let mut frames = vec![frame(None, 0); 30];
    frames.push(frame(Some((700, 650)), 0));
    frames.extend(vec![frame(Some((700, 650)), 2); 10]);
    frames.push(frame(Some((700, 650)), 4));
    let (mut machine, clock) = machine_with(frames);
    let marker = Coordinate::new(700, 650);

    machine.tick().unwrap();
    assert_eq!(machine.tick().unwrap(), TickOutcome::BiteFound { marker });
    assert_eq!(clock.elapsed(), FRAME_COST * 31);

    assert_eq!(machine.tick().unwrap(), TickOutcome::SplashDetected { marker, count: 4 });
    assert_eq!(clock.elapsed(), FRAME_COST * 42);
}

#[test]
fn empty_water_keeps_recasting_every_bite_timeout() {
    let (mut machine, clock) = machine_with(vec![frame(None, 0)]);
    let running = AtomicBool::new(true);
    let mut outcomes = Vec::new();

    machine
        .run(&running, |outcome, stats| {
            outcomes.push(*outcome);
            if stats.missed_bites == 3 {
                running.store(false, Ordering::SeqCst);
            }
        })
        .unwrap();

    assert_eq!(outcomes.iter().filter(|o| **o == TickOutcome::Cast).count(), 3);
    assert!(outcomes.iter().all(|o| matches!(o, TickOutcome::Cast | TickOutcome::NoBite)));
    assert_eq!(machine.input().events(), vec![Event::Tap("0".into()); 3]);
    // each wait starts before 20s and the last capture may overrun by one frame
    let elapsed = clock.elapsed();
    assert!(elapsed >= Duration::from_secs(60) && elapsed <= Duration::from_secs(60) + FRAME_COST * 3);
}

#[test]
fn capture_failure_stops_the_run() {
    let clock = Arc::new(ManualClock::new());
    let mut screen = ScriptedScreen::new(Arc::clone(&clock), vec![frame(None, 0), frame(None, 0)]);
    screen.fail_when_drained = true;
    let input = TimedRecorder { clock: Arc::clone(&clock), events: Vec::new() };
    let mut machine = FishingStateMachine::new(
        FishingConfig::default(),
        screen,
        input,
        Arc::clone(&clock),
        StdRng::seed_from_u64(1),
    );

    let running = AtomicBool::new(true);
    let result = machine.run(&running, |_, _| {});

    assert!(matches!(result, Err(DetectError::CaptureUnavailable(_))));
    assert_eq!(machine.state(), FishingState::AwaitingBite);
    assert_eq!(machine.capture_backend().captures, 3);
    assert_eq!(clock.elapsed(), FRAME_COST * 3);
    assert!(running.load(Ordering::SeqCst));
}
