//! The `refract` binary.

fn main() {
    refract_cli::init_tracing();
    std::process::exit(refract_cli::run_cli(std::env::args()));
}
