fn main() -> anyhow::Result<()> {
    rmtext::cli::run_cli()
}
