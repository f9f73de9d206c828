use clap::Parser;
use modalbox::{AppConfig, Args, Invocation, default_data_dir, effective_config, init_logging};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let data_dir = args.data_dir.clone().unwrap_or_else(default_data_dir);

    let config = match AppConfig::load(&data_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: {e}; using default settings");
            AppConfig::default()
        }
    };
    let config = effective_config(&args, config);

    init_logging(&data_dir, &config.log_level)?;

    if args.save_config {
        config.save(&data_dir)?;
        tracing::info!(path = %AppConfig::path(&data_dir).display(), "Saved config");
    }

    let result = Invocation::from_args(&args, &config)?.run()?;
    tracing::info!(?result, code = result.code(), "Prompt resolved, shutting down");

    println!("{}", result.code());
    std::process::exit(result.code() as i32);
}
