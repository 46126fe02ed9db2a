fn main() -> anyhow::Result<()> {
    tmx2gba::run()
}
