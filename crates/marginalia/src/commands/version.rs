pub fn run() -> anyhow::Result<()> {
    println!("marginalia {}", env!("CARGO_PKG_VERSION"));
    println!("Bookmark topic analysis and knowledge graphs");
    Ok(())
}
