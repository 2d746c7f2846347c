use clap::Parser;

use kuhn::TrainingArgs;

#[derive(Parser)]
struct AppArgs {
    #[clap(flatten)]
    training_args: TrainingArgs,
}

fn main() {
    // Initialize env_logger with a default log level of INFO.
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    let args = AppArgs::parse();
    match kuhn::run(&args.training_args) {
        Ok(report) => println!("{}", report),
        Err(err) => {
            eprintln!("error: {}", err);
            std::process::exit(1);
        }
    }
}
