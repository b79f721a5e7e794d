#![no_std]
#![no_main]

mod global_state;

use rp_pico::entry;
use panic_halt as _;
use rp_pico::hal; // Hardware Abstraction Layer (higher-level drivers)
use rp_pico::hal::pac; // Peripheral Access Crate (low-level register access)
use rp_pico::hal::pac::interrupt;
use rp_pico::hal::timer::Alarm;
use rp_pico::hal::Clock;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, StatefulOutputPin};

use fugit::{MicrosDurationU32, RateExtU32};

use realtime_st7735::animation_bounce::BouncingSprites;
use realtime_st7735::config::{SPRITE_PIXELS, SPRITE_WIDTH};
use realtime_st7735::{Animation, Color, Error, Font, RealtimeDisplay, SpriteSheet, St7735};

use global_state::{shared_state_interrupt_free, SharedState, ATOMIC_STATE, SHARED_STATE};

const SPRITE_KINDS: usize = 2;

static SPRITES: [Color; SPRITE_KINDS * SPRITE_PIXELS] = sprite_sheet();

/// A red ball and a green diamond.
const fn sprite_sheet() -> [Color; SPRITE_KINDS * SPRITE_PIXELS] {
    let mut pixels = [Color::BLACK; SPRITE_KINDS * SPRITE_PIXELS];
    let size = SPRITE_WIDTH as i32;
    let mut i = 0;
    while i < SPRITE_PIXELS {
        // offsets from the sprite center, doubled to stay integral
        let cx = 2 * (i as i32 % size) - (size - 1);
        let cy = 2 * (i as i32 / size) - (size - 1);
        if cx * cx + cy * cy <= size * size {
            pixels[i] = Color::RED;
        }
        if cx.abs() + cy.abs() <= size {
            pixels[SPRITE_PIXELS + i] = Color::GREEN;
        }
        i += 1;
    }
    pixels
}

#[entry]
fn main() -> ! {
    let mut pac = pac::Peripherals::take().unwrap();

    let mut watchdog = hal::Watchdog::new(pac.WATCHDOG);

    // Configure the clocks (125 MHz system clock)
    let clocks = hal::clocks::init_clocks_and_plls(
        rp_pico::XOSC_CRYSTAL_FREQ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    ).unwrap();

    // Set up peripherals (GPIO, Timer/Alarm, SPI for pixel data)
    let sio = hal::Sio::new(pac.SIO); // single-cycle IO
    let pins = rp_pico::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );
    let mut led_pin = pins.led.into_push_pull_output();
    led_pin.set_high().unwrap();

    let mut timer = hal::Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);

    // ST7735 wiring: SCK GPIO18, MOSI GPIO19, D/C GPIO16, CS GPIO17, RST GPIO20
    let spi_sclk = pins.gpio18.into_function::<hal::gpio::FunctionSpi>();
    let spi_mosi = pins.gpio19.into_function::<hal::gpio::FunctionSpi>();
    let spi = hal::spi::Spi::<_, _, _, 8>::new(pac.SPI0, (spi_mosi, spi_sclk)).init(
        &mut pac.RESETS,
        clocks.peripheral_clock.freq(),
        16u32.MHz(),
        embedded_hal::spi::MODE_0,
    );
    let dc = pins.gpio16.into_push_pull_output();
    let cs = pins.gpio17.into_push_pull_output();
    let mut rst = pins.gpio20.into_push_pull_output();

    rst.set_low().unwrap();
    timer.delay_ms(10);
    rst.set_high().unwrap();
    timer.delay_ms(120);

    let mut st7735 = St7735::new(spi, dc, cs);
    st7735.init(&mut timer).unwrap();

    let mut display = RealtimeDisplay::new(st7735, SpriteSheet::new(&SPRITES), Font::ascii());
    let mut animation = BouncingSprites::new(SPRITE_KINDS as u8);

    let mut alarm0 = timer.alarm_0().unwrap();
    alarm0.enable_interrupt();
    cortex_m::interrupt::free(|cs| {
        SHARED_STATE.borrow(cs).replace(Some(SharedState {
            alarm0,
            frame_duration: MicrosDurationU32::millis(20),
        }));
    });
    shared_state_interrupt_free(|state| state.alarm0_reschedule());

    unsafe {
        pac::NVIC::unmask(pac::Interrupt::TIMER_IRQ_0);
    }

    let mut frame: u32 = 0;
    let mut digits = [0u8; 10];
    loop {
        // compute next frame
        let duration = animation.step(display.sprites_mut());
        shared_state_interrupt_free(|state| state.frame_duration = duration);

        // sleep until next frame should be transmitted
        while !ATOMIC_STATE.take_frame_due() {
            cortex_m::asm::wfi();
        }

        // transmit frame, then the frame counter on top (toggle LED to show activity)
        match display.render_frame() {
            // the bad tile stays dirty, everything else was drawn
            Ok(_) | Err(Error::UnknownSprite(_)) => {}
            Err(err) => panic!("{}", err),
        }
        frame = frame.wrapping_add(1);
        display.draw_text(0, 0, format_decimal(frame, &mut digits)).unwrap();
        led_pin.toggle().unwrap();
    }
}

fn format_decimal(mut n: u32, buffer: &mut [u8; 10]) -> &str {
    let mut start = buffer.len();
    loop {
        start -= 1;
        buffer[start] = b'0' + (n % 10) as u8;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    core::str::from_utf8(&buffer[start..]).unwrap()
}

#[interrupt]
fn TIMER_IRQ_0() {
    ATOMIC_STATE.set_frame_due();
    shared_state_interrupt_free(|state| {
        state.alarm0_reschedule();
        state.alarm0_clear_interrupt();
    });
}
