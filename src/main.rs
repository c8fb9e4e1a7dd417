// src/main.rs

use muffle::{cli, logging};

#[tokio::main]
async fn main() {
    let args = cli::parse();
    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("muffle: failed to initialise logging: {err:?}");
        std::process::exit(1);
    }

    match muffle::run(args).await {
        // The contract: our exit status is the child's exit code (or
        // the supervision core's synthetic one).
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("muffle error: {err:?}");
            std::process::exit(1);
        }
    }
}
