fn main() -> anyhow::Result<()> {
    rec_archive::cli::run()
}
