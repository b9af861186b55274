fn main() -> anyhow::Result<std::process::ExitCode> {
    grimmodel::cli::run_cli()
}
