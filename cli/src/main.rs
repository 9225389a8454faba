mod commands;
mod terminal;

use commands::{CommandLine, Commands, local, run, sample};
use reconr_common::config::Config;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    logging::init_logging()?;

    let cfg: Config = commands.options.to_config();
    print::banner(cfg.quiet);

    let outcome = match commands.command {
        Commands::Run => {
            print::header("starting reconnaissance", cfg.quiet);
            run::run(cfg).await
        }
        Commands::Local => {
            print::header("sweeping the local range", cfg.quiet);
            local::local(&cfg).await
        }
        Commands::Sample => {
            print::header("sampling global addresses", cfg.quiet);
            sample::sample(&cfg)
        }
    };

    print::end_of_program();
    outcome
}
