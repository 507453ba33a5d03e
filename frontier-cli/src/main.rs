//! Entry point for the `frontier` command-line interface.
#![forbid(unsafe_code)]

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(err) = frontier_cli::run() {
        eprintln!("frontier: {err}");
        std::process::exit(1);
    }
}
