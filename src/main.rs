#![cfg_attr(target_arch = "avr", no_std, no_main, feature(abi_avr_interrupt))]

#[cfg(target_arch = "avr")]
mod firmware {
    use core::cell::RefCell;

    use avr_device::atmega128a::{Peripherals, PORTB};
    use avr_device::interrupt::{self, CriticalSection, Mutex};
    use panic_halt as _;

    use frame_scheduler::config::TASK_CAPACITY;
    use frame_scheduler::diagnostics::Diagnostics;
    use frame_scheduler::hal::{GlobalInterrupts, Timer0, Timer0Interrupt, Uart};
    use frame_scheduler::logger::{Logger, SerialWriter};
    use frame_scheduler::rtos::{critical, Dispatcher, Frames, InterruptGate, Periods, Registry};

    const MOTOR_PIN: u8 = 4;
    const SERVO_PIN: u8 = 5;

    static DISPATCHER: Mutex<RefCell<Dispatcher<'static, TASK_CAPACITY>>> =
        Mutex::new(RefCell::new(Dispatcher::new()));

    fn toggle(pin: u8) {
        unsafe {
            (*PORTB::ptr())
                .portb
                .modify(|r, w| w.bits(r.bits() ^ (1 << pin)));
        }
    }

    fn on_motor_pwm() {
        toggle(MOTOR_PIN);
    }

    fn on_servo_pwm() {
        toggle(SERVO_PIN);
    }

    fn publish<G: InterruptGate>(gate: &mut G, registry: &mut Registry<'static, TASK_CAPACITY>) {
        let table = registry.stage();
        critical::free(gate, || {
            // SAFETY: TIMER0_OVF is the only other user of DISPATCHER and it is masked
            let cs = unsafe { CriticalSection::new() };
            DISPATCHER.borrow(&cs).borrow_mut().install(table);
        });
    }

    #[avr_device::entry]
    fn main() -> ! {
        let dp = Peripherals::take().unwrap();

        dp.PORTB
            .ddrb
            .write(|w| unsafe { w.bits((1 << MOTOR_PIN) | (1 << SERVO_PIN)) });

        let uart = Uart::new(dp.USART0);
        let mut diag = Diagnostics::new(Logger::new(SerialWriter::new(uart)));
        diag.logger().info("frame scheduler v0.1.0").ok();

        let mut registry = Registry::new();
        diag.check(registry.register(10, Frames::ALL, Periods::ALL, &on_motor_pwm))
            .ok();
        let servo = diag
            .check(registry.register(
                60,
                Frames::F0 | Frames::F2 | Frames::F4,
                Periods::ALL,
                &on_servo_pwm,
            ))
            .ok();

        publish(&mut GlobalInterrupts, &mut registry);

        let mut timer = Timer0::new(dp.TC0);
        timer.enable_overflow_interrupt();
        timer.start();
        unsafe { interrupt::enable() };

        diag.logger().info("timer running").ok();

        // servo joins the odd frames while the timer keeps running
        if let Some(servo) = servo {
            if diag.check(registry.set_frame_mask(servo, Frames::ALL)).is_ok() {
                publish(&mut Timer0Interrupt, &mut registry);
            }
        }

        loop {
            avr_device::asm::sleep();
        }
    }

    #[avr_device::interrupt(atmega128a)]
    fn TIMER0_OVF() {
        interrupt::free(|cs| {
            let mut counter = 0;
            DISPATCHER.borrow(cs).borrow_mut().on_timer_tick(&mut counter);
            Timer0::write_counter(counter);
        });
    }
}

/// Off target: drive the scheduler by hand and print what the timer would
/// have been programmed with.
#[cfg(not(target_arch = "avr"))]
fn main() {
    use std::io::Write;
    use std::sync::atomic::{AtomicU32, Ordering};

    use frame_scheduler::diagnostics::Diagnostics;
    use frame_scheduler::logger::Logger;
    use frame_scheduler::testing::RecordingGate;
    use frame_scheduler::{DefaultScheduler, Frames, Periods};
    use ufmt::{uWrite, uwrite};

    struct Stdout(std::io::Stdout);

    impl uWrite for Stdout {
        type Error = std::io::Error;

        fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
            self.0.write_all(s.as_bytes())
        }
    }

    static MOTOR: AtomicU32 = AtomicU32::new(0);
    static SERVO: AtomicU32 = AtomicU32::new(0);
    let motor = || {
        MOTOR.fetch_add(1, Ordering::Relaxed);
    };
    let servo = || {
        SERVO.fetch_add(1, Ordering::Relaxed);
    };

    let mut diag = Diagnostics::new(Logger::new(Stdout(std::io::stdout())));
    let mut gate = RecordingGate::new();
    let mut scheduler = DefaultScheduler::new();

    diag.check(scheduler.register(10, Frames::ALL, Periods::ALL, &motor)).ok();
    let servo_task = diag
        .check(scheduler.register(60, Frames::F0 | Frames::F2, Periods::P0, &servo))
        .ok();
    // rejected: slot past the frame-advance task
    diag.check(scheduler.register(200, Frames::ALL, Periods::ALL, &servo)).ok();

    let summary = scheduler.publish(&mut gate);
    diag.logger().log_publish(&summary).ok();

    for _ in 0..40 {
        let mut counter = 0;
        scheduler.on_timer_tick(&mut counter);
        let d = scheduler.dispatcher();
        uwrite!(
            diag.logger().writer(),
            "frame {} period {} elapsed {} reload {}\r\n",
            d.frame(),
            d.period(),
            d.elapsed(),
            counter
        )
        .ok();
    }

    if let Some(task) = servo_task {
        diag.check(scheduler.set_frame_mask(task, Frames::ALL)).ok();
        let summary = scheduler.publish(&mut gate);
        diag.logger().log_publish(&summary).ok();
    }

    diag.log_stats(&scheduler.stats()).ok();
    uwrite!(
        diag.logger().writer(),
        "motor {} servo {} errors {}\r\n",
        MOTOR.load(Ordering::Relaxed),
        SERVO.load(Ordering::Relaxed),
        diag.error_count()
    )
    .ok();
}
