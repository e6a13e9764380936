use clap::Parser;
use ramblog::cli::{
    handle_add, handle_delete, handle_get, handle_list, handle_serve, handle_tags, handle_update,
    init_tracing, Cli, Commands,
};
use ramblog::config::log_filter;

fn main() {
    let cli = Cli::parse();

    let filter = match &cli.command {
        Commands::Serve(config) => log_filter(config.debug),
        _ => "ramblog=warn",
    };
    init_tracing(filter);

    let result = match cli.command {
        Commands::Serve(config) => handle_serve(config),
        Commands::List {
            data_dir,
            tag,
            json,
        } => handle_list(&data_dir, tag, json),
        Commands::Get { id, data_dir, json } => handle_get(&data_dir, &id, json),
        Commands::Add {
            title,
            tags,
            stdin,
            data_dir,
            json,
        } => handle_add(&data_dir, title, tags, stdin, json),
        Commands::Update {
            id,
            title,
            tags,
            stdin,
            data_dir,
            json,
        } => handle_update(&data_dir, &id, title, tags, stdin, json),
        Commands::Delete { id, data_dir } => handle_delete(&data_dir, &id),
        Commands::Tags { data_dir, json } => handle_tags(&data_dir, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
