//! Scripted tuning session, standing in for a GUI with gain sliders
//! Run with: cargo run --example tuning_session

use oven_pid::{GainTerm, Session, SessionError};

/// Events a front end would deliver
enum Event {
    Slider(GainTerm, i32),
    StartStop,
    Restart,
    Timer(usize),
}

fn main() {
    println!("=== Oven Tuning Session ===\n");

    let mut session: Session<f64> = Session::default();

    let script = [
        Event::Slider(GainTerm::Proportional, 5),
        Event::StartStop,
        Event::Timer(40),
        Event::StartStop,
        Event::Timer(10), // paused, ignored
        Event::Slider(GainTerm::Integral, 10),
        Event::Slider(GainTerm::Derivative, 120), // rejected
        Event::StartStop,
        Event::Timer(60),
        Event::Restart,
        Event::Slider(GainTerm::Proportional, 10),
        Event::StartStop,
        Event::Timer(100),
    ];

    for event in script {
        match event {
            Event::Slider(term, position) => match session.set_slider(term, position) {
                Ok(_) => println!(">> {}", session.label(term)),
                Err(err @ SessionError::SliderOutOfRange { .. }) => println!(">> Ignored: {}", err),
                Err(err) => println!(">> Error: {}", err),
            },
            Event::StartStop => println!(">> {:?}", session.start_stop()),
            Event::Restart => {
                session.restart();
                println!(">> Restarted, gains kept");
            }
            Event::Timer(count) => {
                let applied = (0..count).filter_map(|_| session.on_timer()).count();
                let trace = session.trace();
                println!(
                    "   {} timer events, {} ticks, temperature {:.3}°C",
                    count,
                    applied,
                    trace[trace.len() - 1]
                );
            }
        }
    }

    let labels: Vec<String> = GainTerm::ALL.iter().map(|&t| session.label(t)).collect();
    println!("\nFinal gains: {}", labels.join(", "));
    println!("{}", session.controller().diagnostics());
}
