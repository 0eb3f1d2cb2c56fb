use mule_config::cli;

fn main() -> anyhow::Result<()> {
    cli::run_cli()
}
