use frame_scheduler::testing::{CallLog, RecordingGate};
use frame_scheduler::{DefaultScheduler, Frames, Periods, Scheduler, SchedulerError};

/// Run one tick and return the reload value written to the counter.
fn tick<const N: usize>(scheduler: &mut Scheduler<'_, N>) -> u8 {
    let mut counter = 0;
    scheduler.on_timer_tick(&mut counter);
    counter
}

#[test]
fn three_task_frame_reloads_counter_per_slot() {
    let log: CallLog<32> = CallLog::new();
    let (a, b, c) = (|| log.push(10), || log.push(50), || log.push(90));

    let mut scheduler = DefaultScheduler::new();
    scheduler.register(10, Frames::ALL, Periods::ALL, &a).unwrap();
    scheduler.register(50, Frames::ALL, Periods::ALL, &b).unwrap();
    scheduler.register(90, Frames::ALL, Periods::ALL, &c).unwrap();
    scheduler.publish(&mut RecordingGate::new());

    assert_eq!(tick(&mut scheduler), 235);
    assert_eq!(scheduler.dispatcher().elapsed(), 20);
    assert!(log.is_empty());

    assert_eq!(tick(&mut scheduler), 175);
    assert_eq!(scheduler.dispatcher().elapsed(), 100);
    assert_eq!(log.iter().collect::<Vec<_>>(), vec![10]);

    assert_eq!(tick(&mut scheduler), 175);
    assert_eq!(scheduler.dispatcher().elapsed(), 180);

    // frame-advance task at slot 127
    assert_eq!(tick(&mut scheduler), 181);
    assert_eq!(scheduler.dispatcher().elapsed(), 254);
    assert!(scheduler
        .dispatcher()
        .latched()
        .map_or(false, |task| task.is_frame_advance()));
    assert_eq!(scheduler.dispatcher().frame(), 0);

    // its latched run opens frame 1 and the scan starts over
    assert_eq!(tick(&mut scheduler), 235);
    assert_eq!(scheduler.dispatcher().frame(), 1);
    assert_eq!(scheduler.dispatcher().period(), 0);
    assert_eq!(scheduler.dispatcher().elapsed(), 20);
    assert_eq!(log.iter().collect::<Vec<_>>(), vec![10, 50, 90]);
}

#[test]
fn sentinel_alone_advances_once_per_frame() {
    let mut scheduler = DefaultScheduler::new();
    scheduler.publish(&mut RecordingGate::new());

    // first tick only latches the frame-advance task
    assert_eq!(tick(&mut scheduler), 1);
    assert_eq!(scheduler.dispatcher().frame(), 0);

    for frame in 1..5u8 {
        assert_eq!(tick(&mut scheduler), 1);
        assert_eq!(scheduler.dispatcher().frame(), frame);
        assert_eq!(scheduler.dispatcher().cursor().scan(), 1);
    }
    tick(&mut scheduler);
    assert_eq!(scheduler.dispatcher().frame(), 0);
    assert_eq!(scheduler.dispatcher().period(), 1);
    assert_eq!(scheduler.stats().frames, 5);
}

#[test]
fn full_cycle_returns_to_start() {
    let mut scheduler = DefaultScheduler::new();
    scheduler.publish(&mut RecordingGate::new());

    // first tick only latches; each later tick runs one frame advance
    tick(&mut scheduler);
    for _ in 0..20 {
        tick(&mut scheduler);
    }
    assert_eq!(scheduler.stats().frames, 20);
    assert_eq!(scheduler.dispatcher().frame(), 0);
    assert_eq!(scheduler.dispatcher().period(), 0);
}

#[test]
fn masks_select_frames_and_periods() {
    let log: CallLog<64> = CallLog::new();
    let even = || log.push(1);
    let p2 = || log.push(2);

    let mut scheduler: Scheduler<'_, 4> = Scheduler::new();
    scheduler
        .register(20, Frames::F0 | Frames::F2 | Frames::F4, Periods::ALL, &even)
        .unwrap();
    scheduler.register(40, Frames::F1, Periods::P2, &p2).unwrap();
    scheduler.publish(&mut RecordingGate::new());

    // drive a whole cycle: every frame has at least the sentinel
    let mut ticks = 0;
    while scheduler.stats().frames < 20 {
        tick(&mut scheduler);
        ticks += 1;
        assert!(ticks < 100);
    }
    assert_eq!(log.count(1), 3 * 4);
    assert_eq!(log.count(2), 1);
}

#[test]
fn staged_edits_wait_for_publish() {
    let log: CallLog<16> = CallLog::new();
    let cb = || log.push(7);

    let mut scheduler: Scheduler<'_, 4> = Scheduler::new();
    let task = scheduler.register(30, Frames::ALL, Periods::ALL, &cb).unwrap();
    scheduler.publish(&mut RecordingGate::new());

    assert_eq!(tick(&mut scheduler), 255 - 60);

    scheduler.set_time(task, 100).unwrap();
    scheduler.set_frame_mask(task, Frames::F3).unwrap();
    assert_eq!(scheduler.schedule(task).unwrap().time(), 100);

    // dispatcher still runs the old copy: sentinel, then slot 30 in frame 1
    assert_eq!(tick(&mut scheduler), 255 - (254 - 60));
    assert_eq!(tick(&mut scheduler), 255 - 60);
    assert_eq!(scheduler.dispatcher().frame(), 1);
    assert_eq!(log.count(7), 1);

    scheduler.publish(&mut RecordingGate::new());
    // rest of frame 1 and all of frame 2 see only the sentinel
    tick(&mut scheduler);
    assert_eq!(tick(&mut scheduler), 255 - 254);
    assert_eq!(scheduler.dispatcher().frame(), 2);
    tick(&mut scheduler);
    assert_eq!(scheduler.dispatcher().frame(), 3);
    // frame 3 picks up the moved task at slot 100
    assert_eq!(scheduler.dispatcher().elapsed(), 200);
}

#[test]
fn full_registry_reports_capacity() {
    let cb = || {};
    let mut scheduler: Scheduler<'_, 3> = Scheduler::new();
    scheduler.register(1, Frames::ALL, Periods::ALL, &cb).unwrap();
    scheduler.register(2, Frames::ALL, Periods::ALL, &cb).unwrap();
    assert_eq!(
        scheduler.register(3, Frames::ALL, Periods::ALL, &cb),
        Err(SchedulerError::CapacityExceeded)
    );
    let summary = scheduler.publish(&mut RecordingGate::new());
    assert_eq!(summary.tasks, 3);
}

#[test]
#[should_panic(expected = "no due task")]
fn dispatch_before_publish_fails_loudly() {
    let mut scheduler = DefaultScheduler::new();
    tick(&mut scheduler);
}

#[test]
fn republish_mid_frame_runs_each_task_once() {
    let log: CallLog<32> = CallLog::new();
    let calls = &log;
    let at = |slot: u8| move || calls.push(slot);
    let (s0, s1, s10, s50, s90) = (at(0), at(1), at(10), at(50), at(90));

    let mut scheduler = DefaultScheduler::new();
    scheduler.register(10, Frames::ALL, Periods::ALL, &s10).unwrap();
    scheduler.register(50, Frames::ALL, Periods::ALL, &s50).unwrap();
    scheduler.register(90, Frames::ALL, Periods::ALL, &s90).unwrap();
    scheduler.publish(&mut RecordingGate::new());

    let reloads: Vec<u8> = (0..3).map(|_| tick(&mut scheduler)).collect();
    assert_eq!(reloads, vec![235, 175, 175]);
    assert_eq!(scheduler.dispatcher().elapsed(), 180);

    // slots ahead of the current position wait for the next frame
    scheduler.register(0, Frames::ALL, Periods::ALL, &s0).unwrap();
    scheduler.register(1, Frames::ALL, Periods::ALL, &s1).unwrap();
    scheduler.publish(&mut RecordingGate::new());

    assert_eq!(tick(&mut scheduler), 255 - (254 - 180));
    assert_eq!(log.iter().collect::<Vec<_>>(), vec![10, 50, 90]);
    log.clear();

    let reloads: Vec<u8> = (0..6).map(|_| tick(&mut scheduler)).collect();
    assert_eq!(reloads, vec![255, 253, 237, 175, 175, 181]);
    assert_eq!(scheduler.dispatcher().frame(), 1);
    assert_eq!(log.iter().collect::<Vec<_>>(), vec![0, 1, 10, 50, 90]);

    tick(&mut scheduler);
    assert_eq!(scheduler.dispatcher().frame(), 2);
}
