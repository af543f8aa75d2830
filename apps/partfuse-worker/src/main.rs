fn main() {
    // Deep part trees recurse during build and flatten; give the pipeline a
    // larger stack than the platform default.
    let child = std::thread::Builder::new()
        .stack_size(1024 * 1024 * 64)
        .spawn(partfuse_worker::internal_main)
        .unwrap();

    if let Err(err) = child.join().unwrap() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}
