//! Closed-loop oven heating
//! Run with: cargo run --example basic_oven

use oven_pid::ControllerBuilder;

fn main() {
    println!("=== Oven Temperature Control ===\n");

    // Target 25°C in an 18°C room
    let mut controller = ControllerBuilder::<f64>::new()
        .target(25.0)
        .room_temperature(18.0)
        .gains(0.2, 0.01, 0.01)
        .build();

    println!("Tick | Temp(°C) | Current | P       | I       | D");
    println!("-----|----------|---------|---------|---------|--------");
    println!(
        "{:4} | {:8.3} | {:7.3} | {:>7} | {:>7} | {:>7}",
        0,
        controller.temperature(),
        controller.control_input(),
        "-",
        "-",
        "-"
    );

    for tick in 1..=300 {
        let output = controller.tick_detailed();

        if tick <= 10 || tick % 25 == 0 {
            println!(
                "{:4} | {:8.3} | {:7.3} | {:7.3} | {:7.3} | {:7.3}",
                tick, output.temperature, output.correction, output.p, output.i, output.d
            );
        }
    }

    let error = controller.target() - controller.temperature();
    if error.abs() < 0.1 {
        println!("\n✓ Within 0.1°C of target after {} ticks", controller.tick_count());
    } else {
        println!("\n✗ Still {:.2}°C off target", error);
    }

    println!("\n{}", controller.diagnostics());
}
