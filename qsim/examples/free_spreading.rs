/// Headless demo of S1 from the scenario suite: a Gaussian wavepacket
/// with no momentum and no potential, spreading freely. Prints the
/// peak probability density at the grid center every 10 steps.

use qsim::Session;

pub fn main() {
    let (nx, ny) = (64, 64);
    let dx = 10.0 / nx as f64;
    let mut session = Session::create_session(nx, ny, dx, 0.01, 1.0, 1.0, 1.0).unwrap();
    session.set_filter_enabled(false);
    session.initialize(5.0, 5.0, 0.6, 0.0, 0.0);

    println!("step\ttime\tpeak|psi|^2\ttotal_probability");
    for step in 0..=100 {
        if step % 10 == 0 {
            let peak = session.get_probability_at(nx / 2, ny / 2).unwrap();
            println!(
                "{step}\t{:.4}\t{:.6}\t{:.9}",
                session.get_time(),
                peak,
                session.get_total_probability()
            );
        }
        session.step();
    }
}
