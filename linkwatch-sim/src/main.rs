fn main() -> anyhow::Result<()> {
    linkwatch_sim::run()
}
