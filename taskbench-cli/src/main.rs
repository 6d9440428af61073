fn main() -> anyhow::Result<()> {
    taskbench_cli::run()
}
