use std::env;

fn main() {
    let target = env::var("TARGET").unwrap_or_default();

    if target.contains("avr") {
        // Configure for ATmega128
        println!("cargo:rustc-link-arg=-mmcu=atmega128");
        println!("cargo:rustc-env=MCU_FREQ_HZ=16000000");

        println!("cargo:warning=Building for ATmega128 at 16MHz");
    }

    println!("cargo:rerun-if-changed=build.rs");
}
