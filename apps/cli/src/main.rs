fn main() -> anyhow::Result<()> {
    cloze_trainer_cli::run()
}
