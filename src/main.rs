fn main() {
    if let Err(err) = schema_standardizer::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
