//! `firedrill`: runs the extinguisher training core headless over a JSON-lines
//! protocol on stdin/stdout.
//!
//! Usage: `firedrill [params.json]`

mod drill_mode;

fn main() {
    let params_path = std::env::args().nth(1);
    drill_mode::run_drill_mode(params_path.as_deref());
}
